//! Configuration handling for the wizard

use crate::admission::DRAFT_KEY;
use crate::wizard::WizardOptions;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the draft directory
pub const DRAFT_DIR_ENV: &str = "ADMISSION_DRAFT_DIR";

/// Default autosave period in seconds
pub const DEFAULT_AUTOSAVE_SECS: u64 = 30;

/// User configuration for the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WizardConfig {
    /// Autosave period in seconds; 0 disables the timer
    pub autosave_interval_secs: Option<u64>,
    /// Key the draft is stored under
    pub draft_key: Option<String>,
    /// Directory holding draft files
    pub draft_dir: Option<PathBuf>,
    /// Re-check earlier steps when resuming a draft
    pub revalidate_on_restore: Option<bool>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("edu", "campus", "admission-wizard")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config dir
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: WizardConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the platform config dir
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Autosave period, or `None` when disabled
    pub fn autosave_interval(&self) -> Option<Duration> {
        match self.autosave_interval_secs.unwrap_or(DEFAULT_AUTOSAVE_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn draft_key(&self) -> &str {
        self.draft_key.as_deref().unwrap_or(DRAFT_KEY)
    }

    /// Draft directory: `ADMISSION_DRAFT_DIR`, then config, then the
    /// platform data dir
    pub fn draft_dir(&self) -> Option<PathBuf> {
        self.draft_dir_with(std::env::var_os(DRAFT_DIR_ENV).map(PathBuf::from))
    }

    fn draft_dir_with(&self, env_override: Option<PathBuf>) -> Option<PathBuf> {
        env_override
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| self.draft_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("drafts")))
    }

    pub fn wizard_options(&self) -> WizardOptions {
        WizardOptions {
            draft_key: self.draft_key().to_string(),
            revalidate_on_restore: self.revalidate_on_restore.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WizardConfig::default();
        assert!(config.autosave_interval_secs.is_none());
        assert!(config.draft_key.is_none());
        assert!(config.draft_dir.is_none());
        assert!(config.revalidate_on_restore.is_none());

        assert_eq!(config.autosave_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.draft_key(), "admissionFormDraft");
        assert_eq!(config.wizard_options(), WizardOptions::default());
    }

    #[test]
    fn test_serialization() {
        let config = WizardConfig {
            autosave_interval_secs: Some(10),
            draft_key: Some("kiosk-3".to_string()),
            draft_dir: Some(PathBuf::from("/var/lib/admissions")),
            revalidate_on_restore: Some(false),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: WizardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let options = parsed.wizard_options();
        assert_eq!(options.draft_key, "kiosk-3");
        assert!(!options.revalidate_on_restore);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: WizardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, WizardConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown fields are ignored
        let json = r#"{"autosave_interval_secs": 5, "theme": "dark"}"#;
        let parsed: WizardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.autosave_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_interval_disables_autosave() {
        let config = WizardConfig {
            autosave_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(config.autosave_interval().is_none());
    }

    #[test]
    fn test_draft_dir_precedence() {
        let config = WizardConfig {
            draft_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.draft_dir_with(Some(PathBuf::from("/from/env"))),
            Some(PathBuf::from("/from/env"))
        );
        assert_eq!(
            config.draft_dir_with(Some(PathBuf::new())),
            Some(PathBuf::from("/from/config"))
        );
        assert_eq!(
            config.draft_dir_with(None),
            Some(PathBuf::from("/from/config"))
        );
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = WizardConfig {
            autosave_interval_secs: Some(45),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(WizardConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = WizardConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, WizardConfig::default());
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(WizardConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_config_path_returns_option() {
        let _path = WizardConfig::config_path();
    }
}
