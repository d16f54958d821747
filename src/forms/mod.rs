//! Request bodies accepted by the quote endpoint.

use actix_multipart::MultipartError;
use thiserror::Error;

pub mod quote;

#[derive(Debug, Error)]
/// Errors that can occur while reading the multipart upload.
pub enum FormError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("form data is not valid UTF-8")]
    Encoding,

    #[error("form data exceeds the size limit")]
    DataTooLarge,

    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("attachment {filename} exceeds {limit} bytes")]
    AttachmentTooLarge { filename: String, limit: usize },

    #[error("more than {limit} attachments")]
    TooManyAttachments { limit: usize },

    #[error("attachments exceed {limit} bytes in total")]
    AttachmentsTooLarge { limit: usize },
}

impl FormError {
    /// Whether the request was rejected for its size rather than its shape.
    pub fn is_too_large(&self) -> bool {
        matches!(
            self,
            FormError::DataTooLarge
                | FormError::AttachmentTooLarge { .. }
                | FormError::TooManyAttachments { .. }
                | FormError::AttachmentsTooLarge { .. }
        )
    }
}
