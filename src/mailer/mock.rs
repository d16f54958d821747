//! Mock mailer for isolating services in tests.

use mockall::mock;

use crate::domain::email::QuoteEmail;
use crate::mailer::{MailError, QuoteMailer};

mock! {
    pub Mailer {}

    impl QuoteMailer for Mailer {
        fn send_quote(&self, email: &QuoteEmail) -> Result<(), MailError>;
    }
}
