use actix_multipart::Multipart;
use futures::TryStreamExt;

use crate::domain::attachment::{Attachment, DEFAULT_MAX_ATTACHMENT_BYTES};
use crate::domain::submission::{DATA_FIELD, FILE_FIELD_PREFIX};
use crate::forms::FormError;

/// Upper bound for the JSON `data` part.
pub const MAX_DATA_BYTES: usize = 256 * 1024;

/// Attachment ceilings enforced while the upload is streamed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentLimits {
    pub max_file_bytes: usize,
    pub max_files: usize,
    pub max_total_bytes: usize,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            max_files: 10,
            max_total_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Raw quote request as received: the unparsed `data` part and every
/// `file_*` part in arrival order.
#[derive(Debug, Default)]
pub struct QuoteUpload {
    pub data: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl QuoteUpload {
    /// Streams the multipart body once. Parts other than `data` and `file_*`
    /// are drained and ignored.
    pub async fn read(mut payload: Multipart, limits: AttachmentLimits) -> Result<Self, FormError> {
        let mut upload = QuoteUpload::default();
        let mut total_bytes = 0usize;

        while let Some(mut field) = payload.try_next().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == DATA_FIELD {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    if bytes.len() + chunk.len() > MAX_DATA_BYTES {
                        return Err(FormError::DataTooLarge);
                    }
                    bytes.extend_from_slice(&chunk);
                }
                let data = String::from_utf8(bytes).map_err(|_| FormError::Encoding)?;
                upload.data = Some(data);
            } else if name.starts_with(FILE_FIELD_PREFIX) {
                if upload.attachments.len() >= limits.max_files {
                    return Err(FormError::TooManyAttachments {
                        limit: limits.max_files,
                    });
                }

                let filename = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .map(str::trim)
                    .filter(|filename| !filename.is_empty())
                    .unwrap_or(name.as_str())
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    if bytes.len() + chunk.len() > limits.max_file_bytes {
                        return Err(FormError::AttachmentTooLarge {
                            filename,
                            limit: limits.max_file_bytes,
                        });
                    }
                    if total_bytes + chunk.len() > limits.max_total_bytes {
                        return Err(FormError::AttachmentsTooLarge {
                            limit: limits.max_total_bytes,
                        });
                    }
                    total_bytes += chunk.len();
                    bytes.extend_from_slice(&chunk);
                }

                let attachment = Attachment::new(filename, content_type, bytes)
                    .map_err(|err| FormError::InvalidAttachment(err.to_string()))?;
                upload.attachments.push(attachment);
            } else {
                while field.try_next().await?.is_some() {}
            }
        }

        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{self, HeaderMap, HeaderValue};
    use actix_web::web::Bytes;
    use futures::stream;

    use super::*;

    const BOUNDARY: &str = "quote-boundary";

    fn part(name: &str, filename: Option<&str>, content_type: Option<&str>, body: &[u8]) -> Vec<u8> {
        let mut out = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"");
        if let Some(filename) = filename {
            out.push_str(&format!("; filename=\"{filename}\""));
        }
        out.push_str("\r\n");
        if let Some(content_type) = content_type {
            out.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        out.push_str("\r\n");
        let mut out = out.into_bytes();
        out.extend_from_slice(body);
        out.extend_from_slice(b"\r\n");
        out
    }

    fn multipart(parts: Vec<Vec<u8>>) -> Multipart {
        let mut body: Vec<u8> = parts.into_iter().flatten().collect();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap(),
        );
        let payload = stream::iter(vec![Ok::<_, actix_web::error::PayloadError>(Bytes::from(
            body,
        ))]);
        Multipart::new(&headers, payload)
    }

    #[actix_web::test]
    async fn reads_data_and_files_in_order() {
        let payload = multipart(vec![
            part("data", None, None, br#"{"projectType":"house"}"#),
            part("file_0", Some("skica.pdf"), Some("application/pdf"), b"%PDF"),
            part("notes", None, None, b"ignored"),
            part("file_1", Some("foto.jpg"), Some("image/jpeg"), b"\xff\xd8"),
        ]);

        let upload = QuoteUpload::read(payload, AttachmentLimits::default())
            .await
            .unwrap();

        assert_eq!(upload.data.as_deref(), Some(r#"{"projectType":"house"}"#));
        let names: Vec<_> = upload
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        assert_eq!(names, vec!["skica.pdf", "foto.jpg"]);
        assert_eq!(
            upload.attachments[0].content_type.as_deref(),
            Some("application/pdf")
        );
    }

    #[actix_web::test]
    async fn missing_data_is_not_an_error_here() {
        let payload = multipart(vec![part("other", None, None, b"x")]);
        let upload = QuoteUpload::read(payload, AttachmentLimits::default())
            .await
            .unwrap();
        assert!(upload.data.is_none());
        assert!(upload.attachments.is_empty());
    }

    #[actix_web::test]
    async fn oversized_attachment_is_rejected() {
        let limits = AttachmentLimits {
            max_file_bytes: 4,
            ..AttachmentLimits::default()
        };
        let payload = multipart(vec![part(
            "file_0",
            Some("big.pdf"),
            Some("application/pdf"),
            b"12345",
        )]);

        let err = QuoteUpload::read(payload, limits).await.unwrap_err();

        assert!(matches!(
            err,
            FormError::AttachmentTooLarge { limit: 4, .. }
        ));
    }

    #[actix_web::test]
    async fn attachment_count_is_capped() {
        let limits = AttachmentLimits {
            max_files: 1,
            ..AttachmentLimits::default()
        };
        let payload = multipart(vec![
            part("file_0", Some("a.pdf"), None, b"a"),
            part("file_1", Some("b.pdf"), None, b"b"),
        ]);

        let err = QuoteUpload::read(payload, limits).await.unwrap_err();

        assert!(matches!(err, FormError::TooManyAttachments { limit: 1 }));
    }
}
