//! Outbound quote notification handed to the mail relay.

use crate::domain::attachment::Attachment;
use crate::domain::types::ContactEmail;

/// Fully rendered email for the studio owner. Sender and recipient are owned
/// by the mailer configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Address of the requester, used as `Reply-To` when present.
    pub reply_to: Option<ContactEmail>,
    pub attachments: Vec<Attachment>,
}
