//! Wizard controller: step sequencing, validation gating and the draft lifecycle

use super::application_id::ApplicationId;
use super::draft::{Draft, DRAFT_FORMAT_VERSION};
use super::view::{StepProgress, StepStatus, WizardView};
use crate::admission::DRAFT_KEY;
use crate::error::{StorageError, ValidationErrors, WizardError};
use crate::state::{Attachment, FieldValue, FormState, ValidationState};
use crate::storage::DraftStore;
use crate::validation::{RuleOutcome, RuleRegistry};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Message recorded for a required document that is not attached
pub const DOCUMENT_REQUIRED_MESSAGE: &str = "This document is required";

/// Per-session knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardOptions {
    /// Key the draft is stored under
    pub draft_key: String,
    /// Re-check earlier steps when resuming instead of trusting the saved step
    pub revalidate_on_restore: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            draft_key: DRAFT_KEY.to_string(),
            revalidate_on_restore: true,
        }
    }
}

/// What `restore_draft` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Draft applied; the session resumes at `step`
    Restored { step: usize },
    NoDraft,
    /// Draft could not be parsed; the session starts empty
    Corrupt,
    /// Store could not be read; the session starts empty
    Unavailable,
}

/// Owns one application session. All mutation of the form goes through here.
pub struct WizardController {
    registry: Arc<RuleRegistry>,
    store: Arc<dyn DraftStore>,
    options: WizardOptions,
    form: FormState,
    errors: ValidationState,
    current_step: usize,
    completed: BTreeSet<usize>,
    dirty: bool,
    changed_at: DateTime<Utc>,
    application_id: Option<ApplicationId>,
    warnings: Vec<String>,
}

impl WizardController {
    /// Create an empty session at step 1 without touching the store
    pub fn new(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn DraftStore>,
        options: WizardOptions,
    ) -> Self {
        Self {
            registry,
            store,
            options,
            form: FormState::default(),
            errors: ValidationState::default(),
            current_step: 1,
            completed: BTreeSet::new(),
            dirty: false,
            changed_at: Utc::now(),
            application_id: None,
            warnings: Vec::new(),
        }
    }

    /// Create a session and resume any saved draft. Never fails: an
    /// unreadable store or draft yields an empty session plus a warning.
    pub async fn open(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn DraftStore>,
        options: WizardOptions,
    ) -> Self {
        let mut controller = Self::new(registry, store, options);
        match controller.restore_draft().await {
            Ok(outcome) => tracing::debug!("Opened wizard session: {outcome:?}"),
            Err(e) => tracing::warn!("Opened wizard session without a draft: {e}"),
        }
        controller
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.registry.step_count()
    }

    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> &ValidationState {
        &self.errors
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Unsaved changes since the last successful save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_submitted(&self) -> bool {
        self.application_id.is_some()
    }

    pub fn application_id(&self) -> Option<&ApplicationId> {
        self.application_id.as_ref()
    }

    /// Drain non-blocking warnings (failed saves, unreadable drafts)
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn last_step(&self) -> usize {
        self.registry.step_count().max(1)
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(())
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        self.changed_at = Utc::now();
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    // === Fields ===

    /// Store a value for a registered field and clear its error.
    /// Unknown fields are rejected rather than silently stored.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;

        let registry = Arc::clone(&self.registry);
        let Some(spec) = registry.field(name) else {
            tracing::warn!("Rejecting value for unknown field {name}");
            return Err(WizardError::UnknownField(name.to_string()));
        };

        let value = value.into();
        if !spec.kind.accepts(&value) {
            return Err(WizardError::TypeMismatch {
                field: name.to_string(),
                expected: spec.kind,
            });
        }

        let previous = self.form.set(name, value);
        if previous.as_ref() != self.form.get(name) {
            for dependent in spec.dependents() {
                if self.form.get(dependent).is_some_and(|v| !v.is_blank()) {
                    tracing::debug!("Clearing {dependent} because {name} changed");
                    self.form.set(dependent, FieldValue::default());
                }
                self.errors.clear_field(dependent);
            }
        }

        self.errors.clear_field(name);
        self.mark_changed();
        Ok(())
    }

    /// Check a candidate value against the field's rules. Other fields are
    /// read from the current form for cross-field rules. No side effects.
    pub fn check_field(&self, name: &str, value: &FieldValue) -> RuleOutcome {
        match self.registry.field(name) {
            Some(spec) => spec.check(Some(value), &self.form),
            None => RuleOutcome::fail(format!("Unknown field: {name}")),
        }
    }

    pub fn validate_field(&self, name: &str, value: &FieldValue) -> bool {
        self.check_field(name, value).valid
    }

    /// Outcome for the value currently stored under `name`
    fn stored_outcome(&self, name: &str) -> RuleOutcome {
        match self.registry.field(name) {
            Some(spec) => spec.check(self.form.get(name), &self.form),
            None => RuleOutcome::fail(format!("Unknown field: {name}")),
        }
    }

    /// Re-check the stored value of one field and record the result, as
    /// when the applicant leaves an input.
    pub fn blur_field(&mut self, name: &str) -> Result<bool, WizardError> {
        if self.registry.field(name).is_none() {
            return Err(WizardError::UnknownField(name.to_string()));
        }
        let outcome = self.stored_outcome(name);
        match &outcome.message {
            Some(message) => self.errors.set_field_error(name, message.clone()),
            None => self.errors.clear_field(name),
        }
        Ok(outcome.valid)
    }

    // === Documents ===

    /// Attach a file under a document key after checking its policy. A
    /// rejected file leaves any earlier attachment in place.
    pub fn attach_document(
        &mut self,
        key: &str,
        attachment: Attachment,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;

        let Some(policy) = self.registry.document(key) else {
            return Err(WizardError::UnknownDocument(key.to_string()));
        };

        if let Err(err) = policy.check(&attachment) {
            tracing::debug!("Rejected {} for {key}: {}", attachment.file_name, err.message);
            self.errors.set_document_error(key, err.message.clone());
            return Err(err.into());
        }

        tracing::debug!("Attached {} as {key}", attachment.file_name);
        self.errors.clear_document(key);
        self.form.attach(key, attachment);
        self.mark_changed();
        Ok(())
    }

    pub fn remove_document(&mut self, key: &str) -> Result<Option<Attachment>, WizardError> {
        self.ensure_open()?;

        if self.registry.document(key).is_none() {
            return Err(WizardError::UnknownDocument(key.to_string()));
        }

        self.errors.clear_document(key);
        let removed = self.form.detach(key);
        if removed.is_some() {
            self.mark_changed();
        }
        Ok(removed)
    }

    // === Steps ===

    /// Errors that block leaving `step`; empty for unknown steps
    fn step_errors(&self, step: usize) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let Some(definition) = self.registry.step(step) else {
            return errors;
        };

        for name in &definition.required_fields {
            let outcome = self.stored_outcome(name);
            if !outcome.valid {
                errors.insert(name.as_str(), outcome.message());
            }
        }
        for key in &definition.required_documents {
            if !self.form.has_document(key) {
                errors.insert(key.as_str(), DOCUMENT_REQUIRED_MESSAGE);
            }
        }
        errors
    }

    fn record_step_errors(&mut self, step: usize, errors: &ValidationErrors) {
        let Some(definition) = self.registry.step(step).cloned() else {
            return;
        };

        for name in &definition.required_fields {
            match errors.get(name) {
                Some(message) => self.errors.set_field_error(name, message),
                None => self.errors.clear_field(name),
            }
        }
        for key in &definition.required_documents {
            match errors.get(key) {
                Some(message) => self.errors.set_document_error(key, message),
                None => self.errors.clear_document(key),
            }
        }
    }

    /// Whether every required field of `step` is valid and every required
    /// document attached. Pure.
    pub fn can_advance(&self, step: usize) -> bool {
        self.registry.step(step).is_some() && self.step_errors(step).is_empty()
    }

    /// Move to the next step if the current one validates. The draft is
    /// saved on success; a failed save is reported as a warning only.
    pub async fn advance(&mut self) -> Result<usize, WizardError> {
        self.ensure_open()?;

        let step = self.current_step;
        let errors = self.step_errors(step);
        self.record_step_errors(step, &errors);
        if !errors.is_empty() {
            tracing::debug!("Step {step} blocked: {errors}");
            return Err(WizardError::Validation(errors));
        }

        self.completed.insert(step);
        self.current_step = (step + 1).min(self.last_step());
        self.mark_changed();
        tracing::debug!("Advanced from step {step} to {}", self.current_step);

        if let Err(e) = self.save_draft().await {
            tracing::debug!("Advanced without a saved draft: {e}");
        }
        Ok(self.current_step)
    }

    /// Go back one step. Never validates and keeps all entered data.
    pub fn retreat(&mut self) -> Result<usize, WizardError> {
        self.ensure_open()?;

        if self.current_step > 1 {
            self.current_step -= 1;
            self.mark_changed();
            tracing::debug!("Moved back to step {}", self.current_step);
        }
        Ok(self.current_step)
    }

    // === Drafts ===

    fn snapshot(&self) -> Draft {
        Draft {
            version: DRAFT_FORMAT_VERSION,
            form_data: self.form.clone(),
            current_step: self.current_step,
            completed_sections: self.completed.clone(),
            timestamp: self.changed_at,
        }
    }

    /// Persist the current state. Saving twice without changes writes the
    /// same bytes.
    pub async fn save_draft(&mut self) -> Result<(), WizardError> {
        self.ensure_open()?;

        let result = match self.snapshot().to_json() {
            Ok(raw) => self.store.save(&self.options.draft_key, &raw).await,
            Err(e) => Err(StorageError::from(e)),
        };

        match result {
            Ok(()) => {
                self.dirty = false;
                tracing::info!("Saved draft at step {}", self.current_step);
                Ok(())
            }
            Err(e) => {
                self.warn(format!("Draft was not saved: {e}"));
                Err(e.into())
            }
        }
    }

    /// Timer entry point: save only when there are unsaved changes.
    /// Returns whether a save happened; failures end up in the warnings.
    pub async fn autosave(&mut self) -> bool {
        if !self.dirty || self.is_submitted() {
            return false;
        }
        self.save_draft().await.is_ok()
    }

    /// Read the persisted draft without applying it
    pub async fn load_draft(&self) -> Result<Option<Draft>, WizardError> {
        match self.store.load(&self.options.draft_key).await? {
            Some(raw) => Ok(Some(Draft::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the session with the persisted draft, if any. Unreadable
    /// drafts reset the session to an empty form at step 1 instead of
    /// failing.
    pub async fn restore_draft(&mut self) -> Result<RestoreOutcome, WizardError> {
        self.ensure_open()?;

        let raw = match self.store.load(&self.options.draft_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No saved draft under {}", self.options.draft_key);
                return Ok(RestoreOutcome::NoDraft);
            }
            Err(e) => {
                self.warn(format!("Saved draft could not be read: {e}"));
                self.reset();
                return Ok(RestoreOutcome::Unavailable);
            }
        };

        match Draft::from_json(&raw) {
            Ok(draft) => {
                let step = self.apply_draft(draft);
                tracing::info!("Restored draft at step {step}");
                Ok(RestoreOutcome::Restored { step })
            }
            Err(e) => {
                self.warn(format!("Discarded unreadable draft: {e}"));
                self.reset();
                Ok(RestoreOutcome::Corrupt)
            }
        }
    }

    fn apply_draft(&mut self, draft: Draft) -> usize {
        let last = self.last_step();
        self.form = draft.form_data;
        self.errors.clear();
        self.completed = draft
            .completed_sections
            .into_iter()
            .filter(|s| (1..=last).contains(s))
            .collect();
        self.current_step = draft.current_step.clamp(1, last);

        if self.options.revalidate_on_restore {
            if let Some(blocked) = (1..self.current_step).find(|s| !self.can_advance(*s)) {
                tracing::debug!(
                    "Resuming at step {blocked} instead of {}: earlier step no longer validates",
                    self.current_step
                );
                self.current_step = blocked;
            }
            let still_valid: BTreeSet<usize> = self
                .completed
                .iter()
                .copied()
                .filter(|s| self.can_advance(*s))
                .collect();
            self.completed = still_valid;
        }

        self.changed_at = draft.timestamp;
        self.dirty = false;
        self.current_step
    }

    fn reset(&mut self) {
        self.form = FormState::default();
        self.errors.clear();
        self.current_step = 1;
        self.completed.clear();
        self.dirty = false;
        self.changed_at = Utc::now();
    }

    // === Submission ===

    /// Final submission from the last step. Every step is re-checked; on
    /// success the draft is deleted and the session is frozen.
    pub async fn submit(&mut self) -> Result<ApplicationId, WizardError> {
        self.ensure_open()?;

        let last = self.last_step();
        if self.current_step != last {
            return Err(WizardError::NotOnFinalStep {
                current: self.current_step,
                last,
            });
        }

        let mut errors = ValidationErrors::new();
        for step in 1..=last {
            let step_errors = self.step_errors(step);
            self.record_step_errors(step, &step_errors);
            errors.merge(step_errors);
        }
        if !errors.is_empty() {
            tracing::debug!("Submission blocked: {errors}");
            return Err(WizardError::Validation(errors));
        }

        let id = ApplicationId::generate(Utc::now());
        if let Err(e) = self.store.remove(&self.options.draft_key).await {
            self.warn(format!("Submitted draft could not be deleted: {e}"));
        }

        self.completed.extend(1..=last);
        self.dirty = false;
        self.application_id = Some(id.clone());
        tracing::info!("Application {id} submitted");
        Ok(id)
    }

    // === Presentation ===

    pub fn view(&self) -> WizardView {
        let submitted = self.is_submitted();
        let steps = self
            .registry
            .steps()
            .iter()
            .map(|step| {
                let status = if submitted {
                    StepStatus::Completed
                } else if step.index == self.current_step {
                    StepStatus::Current
                } else if self.completed.contains(&step.index) {
                    StepStatus::Completed
                } else {
                    StepStatus::Upcoming
                };
                StepProgress {
                    index: step.index,
                    title: step.title.clone(),
                    status,
                }
            })
            .collect();

        let total = self.registry.step_count();
        let progress_percent = if submitted {
            100
        } else {
            (self.completed.len() * 100 / total.max(1)).min(100) as u8
        };

        WizardView {
            current_step: self.current_step,
            total_steps: total,
            step_title: self
                .registry
                .step(self.current_step)
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            steps,
            progress_percent,
            form_data: self.form.clone(),
            errors: self.errors.clone(),
            can_advance: !submitted && self.can_advance(self.current_step),
            has_unsaved_changes: self.dirty,
            application_id: self.application_id.clone(),
            warnings: self.warnings.clone(),
        }
    }
}
