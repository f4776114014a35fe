//! Field specs, step definitions and the registry that groups them

use super::documents::DocumentPolicy;
use super::rules::{Rule, RuleOutcome};
use crate::state::{FieldValue, FormState};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Choice,
    File,
    Group,
}

impl FieldKind {
    /// Whether a value may be stored in a field of this kind.
    /// Number fields also take text, since form inputs arrive as strings.
    /// Non-finite numbers are never accepted.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        value.is_finite()
            && matches!(
                (self, value),
                (Self::Text | Self::Date | Self::Choice, FieldValue::Text(_))
                    | (Self::Number, FieldValue::Number(_) | FieldValue::Text(_))
                    | (Self::File, FieldValue::File(_))
                    | (Self::Group, FieldValue::Map(_))
            )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Choice => "choice",
            Self::File => "file",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents a single form field with its configuration and rules
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    required_message: String,
    rules: Vec<Rule>,
    /// Fields cleared when this one changes value
    resets: Vec<String>,
}

impl FieldSpec {
    /// Create an optional field
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            required_message: format!("{label} is required"),
            rules: Vec::new(),
            resets: Vec::new(),
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn choice(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Choice)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// Mark the field required, with the message shown when it is blank
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn resets(mut self, field: &str) -> Self {
        self.resets.push(field.to_string());
        self
    }

    pub fn dependents(&self) -> &[String] {
        &self.resets
    }

    /// Blank values only fail required fields; otherwise rules run in order
    /// and the first failure wins.
    pub fn check(&self, value: Option<&FieldValue>, form: &FormState) -> RuleOutcome {
        let Some(value) = value.filter(|v| !v.is_blank()) else {
            return if self.required {
                RuleOutcome::fail(self.required_message.clone())
            } else {
                RuleOutcome::ok()
            };
        };

        if !self.kind.accepts(value) {
            return RuleOutcome::fail(format!("{} has an invalid value", self.label));
        }

        match self.rules.iter().try_for_each(|rule| rule.check(value, form)) {
            Ok(()) => RuleOutcome::ok(),
            Err(message) => RuleOutcome::fail(message),
        }
    }
}

/// One page of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    /// 1-based position, assigned by the registry
    pub index: usize,
    pub title: String,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub required_documents: Vec<String>,
}

impl StepDefinition {
    pub fn new(title: &str) -> Self {
        Self {
            index: 0,
            title: title.to_string(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            required_documents: Vec::new(),
        }
    }

    pub fn require_fields(mut self, fields: &[&str]) -> Self {
        self.required_fields
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn optional_fields(mut self, fields: &[&str]) -> Self {
        self.optional_fields
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn require_documents(mut self, documents: &[&str]) -> Self {
        self.required_documents
            .extend(documents.iter().map(|d| d.to_string()));
        self
    }
}

/// Everything the wizard needs to know about a particular form
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    fields: BTreeMap<String, FieldSpec>,
    steps: Vec<StepDefinition>,
    documents: BTreeMap<String, DocumentPolicy>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(spec.name.clone(), spec);
        self
    }

    pub fn with_fields(self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        specs.into_iter().fold(self, Self::with_field)
    }

    /// Append a step; its index is its 1-based position
    pub fn with_step(mut self, mut step: StepDefinition) -> Self {
        step.index = self.steps.len() + 1;
        self.steps.push(step);
        self
    }

    pub fn with_document(mut self, policy: DocumentPolicy) -> Self {
        self.documents.insert(policy.key.clone(), policy);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn document(&self, key: &str) -> Option<&DocumentPolicy> {
        self.documents.get(key)
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentPolicy> {
        self.documents.values()
    }

    /// Names referenced by steps but never registered. Useful when
    /// assembling a registry by hand.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for step in &self.steps {
            for name in step.required_fields.iter().chain(&step.optional_fields) {
                if !self.fields.contains_key(name) {
                    missing.push(name.clone());
                }
            }
            for key in &step.required_documents {
                if !self.documents.contains_key(key) {
                    missing.push(key.clone());
                }
            }
        }
        missing
    }
}
