//! Attachment policies per document key

use crate::error::{AttachmentError, AttachmentRejection};
use crate::state::Attachment;

/// One mebibyte
pub const MIB: u64 = 1024 * 1024;

/// Which files a document key accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub key: String,
    pub label: String,
    pub required: bool,
    /// Lowercase extensions with leading dot
    pub accept: Vec<String>,
    pub max_bytes: u64,
}

impl DocumentPolicy {
    pub fn new<I, S>(key: &str, label: &str, accept: I, max_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required: false,
            accept: accept
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Extension first, then size. Exactly `max_bytes` is accepted.
    pub fn check(&self, attachment: &Attachment) -> Result<(), AttachmentError> {
        let accepted = attachment
            .extension()
            .is_some_and(|ext| self.accept.iter().any(|a| *a == ext));
        if !accepted {
            return Err(self.reject(
                AttachmentRejection::InvalidType,
                format!("Invalid file type. Accepted formats: {}", self.accept.join(",")),
            ));
        }

        if attachment.size_bytes > self.max_bytes {
            return Err(self.reject(
                AttachmentRejection::TooLarge,
                format!("File size too large. Maximum size: {}", format_size(self.max_bytes)),
            ));
        }

        Ok(())
    }

    fn reject(&self, reason: AttachmentRejection, message: String) -> AttachmentError {
        AttachmentError {
            key: self.key.clone(),
            reason,
            message,
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}
