//! Step-by-step form session: controller, drafts, autosave and the view

mod application_id;
mod autosave;
mod controller;
mod draft;
mod view;

pub use application_id::ApplicationId;
pub use autosave::{AutosaveHandle, SharedController, MIN_AUTOSAVE_PERIOD};
pub use controller::{RestoreOutcome, WizardController, WizardOptions, DOCUMENT_REQUIRED_MESSAGE};
pub use draft::{Draft, DRAFT_FORMAT_VERSION};
pub use view::{StepProgress, StepStatus, WizardView};
