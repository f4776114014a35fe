//! Form value map and per-field validation messages

use super::field::{Attachment, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values entered so far, keyed by field name, plus attached documents.
///
/// Mutation is crate-private: everything outside the crate goes through
/// the wizard controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    values: BTreeMap<String, FieldValue>,
    #[serde(default)]
    documents: BTreeMap<String, Attachment>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text of a field, or None if unset or not text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn document(&self, key: &str) -> Option<&Attachment> {
        self.documents.get(key)
    }

    pub fn has_document(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &Attachment)> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.documents.is_empty()
    }

    /// Overwrite a value, returning the previous one
    pub(crate) fn set(&mut self, name: &str, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.to_string(), value)
    }

    pub(crate) fn attach(&mut self, key: &str, attachment: Attachment) -> Option<Attachment> {
        self.documents.insert(key.to_string(), attachment)
    }

    pub(crate) fn detach(&mut self, key: &str) -> Option<Attachment> {
        self.documents.remove(key)
    }
}

/// Messages for fields and documents that failed their last check.
/// An absent entry means valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationState {
    fields: BTreeMap<String, String>,
    documents: BTreeMap<String, String>,
}

impl ValidationState {
    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn document_error(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }

    pub fn field_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn document_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_clean(&self) -> bool {
        self.fields.is_empty() && self.documents.is_empty()
    }

    pub(crate) fn set_field_error(&mut self, name: &str, message: impl Into<String>) {
        self.fields.insert(name.to_string(), message.into());
    }

    pub(crate) fn clear_field(&mut self, name: &str) {
        self.fields.remove(name);
    }

    pub(crate) fn set_document_error(&mut self, key: &str, message: impl Into<String>) {
        self.documents.insert(key.to_string(), message.into());
    }

    pub(crate) fn clear_document(&mut self, key: &str) {
        self.documents.remove(key);
    }

    pub(crate) fn clear(&mut self) {
        self.fields.clear();
        self.documents.clear();
    }
}
