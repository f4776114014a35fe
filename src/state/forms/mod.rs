//! Form domain layer
//!
//! Value objects held by the wizard: field values, attachments, the value
//! map and the validation message map.

mod field;
mod form_state;

pub use field::{Attachment, FieldValue};
pub use form_state::{FormState, ValidationState};
