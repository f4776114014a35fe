//! Serializable snapshot of an in-progress application

use crate::error::DraftError;
use crate::state::FormState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current on-disk draft layout
pub const DRAFT_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DRAFT_FORMAT_VERSION
}

fn default_step() -> usize {
    1
}

/// Everything needed to resume a session.
///
/// `timestamp` is the time of the last change to the wizard, not the time
/// of the save, so saving twice without changes yields identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub form_data: FormState,
    #[serde(default = "default_step")]
    pub current_step: usize,
    #[serde(default)]
    pub completed_sections: BTreeSet<usize>,
    pub timestamp: DateTime<Utc>,
}

impl Draft {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let draft: Draft = serde_json::from_str(raw)?;
        if draft.version > DRAFT_FORMAT_VERSION {
            return Err(DraftError::UnsupportedVersion(draft.version));
        }
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Draft {
        Draft {
            version: DRAFT_FORMAT_VERSION,
            form_data: FormState::new(),
            current_step: 3,
            completed_sections: [1, 2].into_iter().collect(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"formData\""));
        assert!(json.contains("\"currentStep\":3"));
        assert!(json.contains("\"completedSections\":[1,2]"));
        assert!(json.contains("\"timestamp\":\"2025-06-01T10:30:00Z\""));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let draft = Draft::from_json(r#"{"timestamp":"2025-06-01T10:30:00Z"}"#).unwrap();
        assert_eq!(draft.version, DRAFT_FORMAT_VERSION);
        assert_eq!(draft.current_step, 1);
        assert!(draft.completed_sections.is_empty());
        assert!(draft.form_data.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Draft::from_json("{not json"),
            Err(DraftError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_newer_versions() {
        let mut draft = sample();
        draft.version = DRAFT_FORMAT_VERSION + 1;
        let json = serde_json::to_string(&draft).unwrap();
        assert!(matches!(
            Draft::from_json(&json),
            Err(DraftError::UnsupportedVersion(2))
        ));
    }
}
