//! Read-only snapshot handed to the presentation layer

use super::application_id::ApplicationId;
use crate::state::{FormState, ValidationState};
use serde::Serialize;

/// Where a step sits relative to the applicant's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub index: usize,
    pub title: String,
    pub status: StepStatus,
}

/// State of the wizard after the last command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub current_step: usize,
    pub total_steps: usize,
    pub step_title: String,
    pub steps: Vec<StepProgress>,
    pub progress_percent: u8,
    pub form_data: FormState,
    pub errors: ValidationState,
    pub can_advance: bool,
    pub has_unsaved_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl WizardView {
    pub fn is_submitted(&self) -> bool {
        self.application_id.is_some()
    }

    /// Short "Step 2 of 4: Academic" line
    pub fn headline(&self) -> String {
        match &self.application_id {
            Some(id) => format!("Application submitted: {id}"),
            None => format!(
                "Step {} of {}: {}",
                self.current_step, self.total_steps, self.step_title
            ),
        }
    }
}
