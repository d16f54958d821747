//! SMTP relay delivering quote notifications to the studio inbox.

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailPart, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::domain::email::QuoteEmail;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Implicit-TLS SMTP port; every other port is upgraded with STARTTLS.
pub const SMTPS_PORT: u16 = 465;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP not configured")]
    NotConfigured,

    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Connection settings for the mail relay.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Display name of the sender; the address is the SMTP user.
    pub from_name: String,
    /// Studio inbox receiving every quote.
    pub to: String,
}

/// Delivers a rendered quote email. Implementations block until the relay
/// answers and are called from the blocking pool.
pub trait QuoteMailer: Send + Sync {
    fn send_quote(&self, email: &QuoteEmail) -> Result<(), MailError>;
}

/// `lettre` SMTP transport authenticated with the configured account.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Fails with [`MailError::NotConfigured`] when the credentials are
    /// missing or blank.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let user = non_blank(config.user.as_deref()).ok_or(MailError::NotConfigured)?;
        let pass = non_blank(config.pass.as_deref()).ok_or(MailError::NotConfigured)?;

        let from = Mailbox::new(Some(config.from_name.clone()), parse_address(user)?);
        let to = Mailbox::new(None, parse_address(&config.to)?);

        let builder = if config.port == SMTPS_PORT {
            SmtpTransport::relay(&config.host)
        } else {
            SmtpTransport::starttls_relay(&config.host)
        }
        .map_err(|err| MailError::Transport(err.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Assembles the MIME message: plain text and HTML alternatives followed
    /// by one part per attachment.
    pub fn build_message(&self, email: &QuoteEmail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject.as_str());

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(Mailbox::new(None, parse_address(reply_to.as_str())?));
        }

        let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ));

        for attachment in &email.attachments {
            let content_type = attachment
                .content_type
                .as_deref()
                .and_then(|value| ContentType::parse(value).ok())
                .map_or_else(|| ContentType::parse(FALLBACK_CONTENT_TYPE), Ok)
                .map_err(|err| MailError::Build(err.to_string()))?;

            body = body.singlepart(
                MailPart::new(attachment.filename.to_string())
                    .body(attachment.bytes.clone(), content_type),
            );
        }

        builder
            .multipart(body)
            .map_err(|err| MailError::Build(err.to_string()))
    }
}

impl QuoteMailer for SmtpMailer {
    fn send_quote(&self, email: &QuoteEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport
            .send(&message)
            .map_err(|err| MailError::Transport(err.to_string()))?;
        Ok(())
    }
}

/// Stand-in used when no SMTP credentials are configured; every send fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredMailer;

impl QuoteMailer for UnconfiguredMailer {
    fn send_quote(&self, _email: &QuoteEmail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Builds the SMTP mailer, or the unconfigured stand-in when credentials are
/// missing. The server starts either way.
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn QuoteMailer>, MailError> {
    match SmtpMailer::new(config) {
        Ok(mailer) => {
            log::info!(
                "Quote emails are relayed through {}:{} to {}",
                config.host,
                config.port,
                config.to
            );
            Ok(Arc::new(mailer))
        }
        Err(MailError::NotConfigured) => {
            log::warn!("SMTP not configured, quote requests will be rejected");
            Ok(Arc::new(UnconfiguredMailer))
        }
        Err(err) => Err(err),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_address(value: &str) -> Result<Address, MailError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| MailError::InvalidAddress(value.to_string()))
}
