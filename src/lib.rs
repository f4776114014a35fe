//! Admission Wizard - multi-step application form engine
//!
//! Drives a four-step admission form: per-field validation, step gating,
//! document attachment checks, autosaved drafts that survive restarts, and
//! final submission.

pub mod admission;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod validation;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{StorageError, ValidationErrors, WizardError};
pub use state::{Attachment, FieldValue, FormState, ValidationState};
pub use storage::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use validation::RuleRegistry;
pub use wizard::{AutosaveHandle, WizardController, WizardOptions, WizardView};
