//! Error types for wizard operations

use crate::validation::FieldKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Structured error type for all wizard operations
#[derive(Debug, Error)]
pub enum WizardError {
    /// One or more fields or documents failed validation
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The draft store failed to read or write
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    /// A document was rejected by its attachment policy
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown document: {0}")]
    UnknownDocument(String),

    #[error("field {field} expects a {expected} value")]
    TypeMismatch { field: String, expected: FieldKind },

    #[error("submission is only possible from step {last} (currently on step {current})")]
    NotOnFinalStep { current: usize, last: usize },

    #[error("application has already been submitted")]
    AlreadySubmitted,
}

/// Failures of the draft persistence boundary
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read draft {key}: {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to write draft {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to remove draft {key}: {source}")]
    Remove {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("draft store unavailable: {0}")]
    Backend(String),
}

/// A persisted draft could not be turned back into wizard state
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("malformed draft: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported draft format version {0}")]
    UnsupportedVersion(u32),
}

/// Why an attachment was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRejection {
    InvalidType,
    TooLarge,
}

/// A file rejected for a single document key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key}: {message}")]
pub struct AttachmentError {
    pub key: String,
    pub reason: AttachmentRejection,
    pub message: String,
}

/// Field (or document key) to message map carried by a failed step transition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors, keeping the first message seen per key
    pub fn merge(&mut self, other: ValidationErrors) {
        for (key, message) in other.0 {
            self.0.entry(key).or_insert(message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(
            f,
            "validation failed for {} field(s): {}",
            keys.len(),
            keys.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_lists_keys() {
        let mut errors = ValidationErrors::new();
        errors.insert("email", "Please enter a valid email address");
        errors.insert("city", "City is required");

        assert_eq!(
            errors.to_string(),
            "validation failed for 2 field(s): city, email"
        );
    }

    #[test]
    fn test_merge_keeps_first_message() {
        let mut first = ValidationErrors::new();
        first.insert("photo", "This document is required");

        let mut second = ValidationErrors::new();
        second.insert("photo", "something else");
        second.insert("mobile", "Mobile number is required");

        first.merge(second);

        assert_eq!(first.len(), 2);
        assert_eq!(first.get("photo"), Some("This document is required"));
        assert!(first.contains("mobile"));
    }

    #[test]
    fn test_storage_error_converts_into_wizard_error() {
        let err: WizardError = StorageError::Backend("offline".to_string()).into();
        assert!(matches!(err, WizardError::Storage(_)));
        assert_eq!(err.to_string(), "draft store unavailable: offline");
    }

    #[test]
    fn test_attachment_error_display() {
        let err = AttachmentError {
            key: "photo".to_string(),
            reason: AttachmentRejection::InvalidType,
            message: "Invalid file type. Accepted formats: .jpg,.jpeg,.png".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "photo: Invalid file type. Accepted formats: .jpg,.jpeg,.png"
        );
    }
}
