//! Domain types shared by the quote wizard and the submission service.

pub mod attachment;
pub mod email;
pub mod form_values;
pub mod project_type;
pub mod submission;
pub mod types;
pub mod wizard;
