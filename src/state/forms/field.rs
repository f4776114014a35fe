//! Form field value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to an uploaded file. Only metadata is kept; the bytes stay with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lowercased extension including the leading dot, e.g. `.pdf`
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    File(Attachment),
    Map(BTreeMap<String, FieldValue>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// False when a number (at any nesting depth) is NaN or infinite.
    /// JSON has no encoding for those, so they could not survive a draft.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::Number(n) => n.is_finite(),
            FieldValue::Map(map) => map.values().all(FieldValue::is_finite),
            FieldValue::Text(_) | FieldValue::File(_) => true,
        }
    }

    /// True when the value counts as "not filled in"
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Map(m) => m.is_empty(),
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::File(_) => false,
        }
    }

    /// Get the text value (None for non-text values)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the value; text is parsed after trimming
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::File(a) => a.file_name.clone(),
            FieldValue::Map(m) => match m.len() {
                1 => "1 entry".to_string(),
                n => format!("{n} entries"),
            },
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<Attachment> for FieldValue {
    fn from(value: Attachment) -> Self {
        FieldValue::File(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod attachment {
        use super::*;

        #[test]
        fn test_extension_is_lowercased_with_dot() {
            let file = Attachment::new("Scan.PDF", 10);
            assert_eq!(file.extension().as_deref(), Some(".pdf"));
        }

        #[test]
        fn test_extension_uses_last_segment() {
            let file = Attachment::new("marks.final.jpeg", 10);
            assert_eq!(file.extension().as_deref(), Some(".jpeg"));
        }

        #[test]
        fn test_no_extension() {
            assert!(Attachment::new("photo", 10).extension().is_none());
            assert!(Attachment::new(".bashrc", 10).extension().is_none());
            assert!(Attachment::new("photo.", 10).extension().is_none());
        }

        #[test]
        fn test_with_content_type() {
            let file = Attachment::new("a.png", 1).with_content_type("image/png");
            assert_eq!(file.content_type.as_deref(), Some("image/png"));
        }
    }

    mod field_value {
        use super::*;

        #[test]
        fn test_default_is_empty_text() {
            assert_eq!(FieldValue::default(), FieldValue::Text(String::new()));
            assert!(FieldValue::default().is_blank());
        }

        #[test]
        fn test_is_finite() {
            assert!(FieldValue::from(92.5).is_finite());
            assert!(FieldValue::from("NaN").is_finite());
            assert!(!FieldValue::from(f64::NAN).is_finite());
            assert!(!FieldValue::from(f64::NEG_INFINITY).is_finite());
        }

        #[test]
        fn test_whitespace_text_is_blank() {
            assert!(FieldValue::from("   ").is_blank());
            assert!(!FieldValue::from(" a ").is_blank());
        }

        #[test]
        fn test_numbers_and_files_are_never_blank() {
            assert!(!FieldValue::from(0.0).is_blank());
            assert!(!FieldValue::from(Attachment::new("a.pdf", 0)).is_blank());
        }

        #[test]
        fn test_empty_map_is_blank() {
            assert!(FieldValue::Map(BTreeMap::new()).is_blank());
        }

        #[test]
        fn test_as_number_parses_text() {
            assert_eq!(FieldValue::from(" 87.5 ").as_number(), Some(87.5));
            assert_eq!(FieldValue::from(-1_i64).as_number(), Some(-1.0));
            assert_eq!(FieldValue::from("eighty").as_number(), None);
            assert_eq!(FieldValue::from("NaN").as_number(), None);
        }

        #[test]
        fn test_display_value() {
            assert_eq!(FieldValue::from(2024_i64).display_value(), "2024");
            assert_eq!(FieldValue::from(8.25).display_value(), "8.25");
            assert_eq!(
                FieldValue::from(Attachment::new("a.pdf", 3)).display_value(),
                "a.pdf"
            );
            let mut map = BTreeMap::new();
            map.insert("line1".to_string(), FieldValue::from("MG Road"));
            assert_eq!(FieldValue::Map(map).display_value(), "1 entry");
        }
    }
}
