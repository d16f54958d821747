//! Business logic behind the HTTP routes.

use thiserror::Error;

use crate::mailer::MailError;

pub mod quote;
pub mod wizard;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing form data")]
    MissingData,

    #[error("invalid form data: {0}")]
    InvalidData(String),

    #[error("unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("SMTP not configured")]
    MailNotConfigured,

    #[error("mail delivery failed: {0}")]
    Mail(MailError),
}

impl From<MailError> for ServiceError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::NotConfigured => ServiceError::MailNotConfigured,
            other => ServiceError::Mail(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
