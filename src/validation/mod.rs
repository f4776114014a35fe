//! Validation rule registry
//!
//! Field rules, step definitions and document policies. The wizard
//! controller is parameterized by a [`RuleRegistry`], so the same engine
//! serves any step layout.

mod documents;
mod registry;
mod rules;

pub use documents::{DocumentPolicy, MIB};
pub use registry::{FieldKind, FieldSpec, RuleRegistry, StepDefinition};
pub use rules::{Rule, RuleOutcome};
