//! Binary files supplied by the visitor alongside a quote request.

use std::fmt::{Debug, Formatter};

use crate::domain::types::{AttachmentName, TypeConstraintError};

/// Default per-file ceiling enforced by the wizard and the server (5 MB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// One user-supplied file: name, declared content type and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: AttachmentName,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new<S: Into<String>>(
        filename: S,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            filename: AttachmentName::new(filename)?,
            content_type: content_type
                .map(|ct| ct.trim().to_string())
                .filter(|ct| !ct.is_empty()),
            bytes,
        })
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reads a file from disk, guessing its content type from the extension.
    #[cfg(feature = "client")]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        Self::new(filename, content_type, bytes)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))
    }
}

impl Debug for Attachment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_type_is_dropped() {
        let attachment = Attachment::new("plan.pdf", Some("  ".to_string()), vec![1, 2]).unwrap();
        assert_eq!(attachment.content_type, None);
        assert_eq!(attachment.size(), 2);
    }

    #[test]
    fn blank_filename_is_rejected() {
        assert!(Attachment::new(" ", None, Vec::new()).is_err());
    }

    #[cfg(feature = "client")]
    #[test]
    fn reads_file_from_disk() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("situacija.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.filename.as_str(), "situacija.pdf");
        assert_eq!(attachment.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(attachment.bytes, b"%PDF-1.4");
    }
}
