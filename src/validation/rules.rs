//! Field rules and their evaluation

use crate::state::{FieldValue, FormState};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Result of checking one field. Both the "can I proceed" path and the
/// "what do I show" path read this same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub valid: bool,
    pub message: Option<String>,
}

impl RuleOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Message to display, empty when valid
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

type CustomCheck = dyn Fn(&FieldValue, &FormState) -> Result<(), String> + Send + Sync;

/// A single constraint on a non-blank value
#[derive(Clone)]
pub enum Rule {
    /// Text must match the pattern
    Pattern { regex: Regex, message: String },
    /// Value must parse as a number within `min..=max`
    Range { min: f64, max: f64, message: String },
    /// Text must be one of the listed options
    OneOf {
        options: Vec<String>,
        message: String,
    },
    /// Text must be a calendar date in `YYYY-MM-DD` form
    IsoDate { message: String },
    /// Picks a rule set by the current value of another field.
    /// Fails with `unset_message` while that field is blank; values
    /// without a case are unconstrained.
    Switch {
        on: String,
        cases: BTreeMap<String, Vec<Rule>>,
        unset_message: String,
    },
    /// Value must differ from every listed field's value
    DistinctFrom { fields: Vec<String>, message: String },
    Custom(Arc<CustomCheck>),
}

impl Rule {
    pub fn pattern(regex: &Regex, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex: regex.clone(),
            message: message.into(),
        }
    }

    pub fn range(min: f64, max: f64, message: impl Into<String>) -> Self {
        Rule::Range {
            min,
            max,
            message: message.into(),
        }
    }

    pub fn one_of<I, S>(options: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf {
            options: options.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn iso_date(message: impl Into<String>) -> Self {
        Rule::IsoDate {
            message: message.into(),
        }
    }

    pub fn switch(
        on: impl Into<String>,
        cases: BTreeMap<String, Vec<Rule>>,
        unset_message: impl Into<String>,
    ) -> Self {
        Rule::Switch {
            on: on.into(),
            cases,
            unset_message: unset_message.into(),
        }
    }

    pub fn distinct_from<I, S>(fields: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::DistinctFrom {
            fields: fields.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&FieldValue, &FormState) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(check))
    }

    /// Check a non-blank value. `form` supplies the other fields for
    /// cross-field rules.
    pub fn check(&self, value: &FieldValue, form: &FormState) -> Result<(), String> {
        match self {
            Rule::Pattern { regex, message } => match value.as_text() {
                Some(text) if regex.is_match(text) => Ok(()),
                _ => Err(message.clone()),
            },
            Rule::Range { min, max, message } => match value.as_number() {
                Some(n) if n >= *min && n <= *max => Ok(()),
                _ => Err(message.clone()),
            },
            Rule::OneOf { options, message } => match value.as_text() {
                Some(text) if options.iter().any(|o| o == text.trim()) => Ok(()),
                _ => Err(message.clone()),
            },
            Rule::IsoDate { message } => match value.as_text() {
                Some(text) if NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok() => {
                    Ok(())
                }
                _ => Err(message.clone()),
            },
            Rule::Switch {
                on,
                cases,
                unset_message,
            } => {
                let selector = form
                    .get(on)
                    .filter(|v| !v.is_blank())
                    .map(FieldValue::display_value);
                let Some(selector) = selector else {
                    return Err(unset_message.clone());
                };
                match cases.get(selector.trim()) {
                    Some(rules) => rules.iter().try_for_each(|rule| rule.check(value, form)),
                    None => Ok(()),
                }
            }
            Rule::DistinctFrom { fields, message } => {
                let mine = value.display_value();
                let clash = fields.iter().filter_map(|f| form.get(f)).any(|other| {
                    !other.is_blank() && other.display_value().trim() == mine.trim()
                });
                if clash {
                    Err(message.clone())
                } else {
                    Ok(())
                }
            }
            Rule::Custom(check) => check(value, form),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern { regex, .. } => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Range { min, max, .. } => f.debug_tuple("Range").field(min).field(max).finish(),
            Rule::OneOf { options, .. } => f.debug_tuple("OneOf").field(options).finish(),
            Rule::IsoDate { .. } => f.write_str("IsoDate"),
            Rule::Switch { on, cases, .. } => f
                .debug_struct("Switch")
                .field("on", on)
                .field("cases", &cases.keys().collect::<Vec<_>>())
                .finish(),
            Rule::DistinctFrom { fields, .. } => {
                f.debug_tuple("DistinctFrom").field(fields).finish()
            }
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(pairs: &[(&str, &str)]) -> FormState {
        let mut form = FormState::new();
        for (name, value) in pairs {
            form.set(name, (*value).into());
        }
        form
    }

    #[test]
    fn test_outcome_message_empty_when_valid() {
        assert_eq!(RuleOutcome::ok().message(), "");
        assert_eq!(RuleOutcome::fail("nope").message(), "nope");
    }

    #[test]
    fn test_pattern_rejects_numbers() {
        let regex = Regex::new(r"^[0-9]{6}$").unwrap();
        let rule = Rule::pattern(&regex, "bad pin");
        let form = FormState::new();
        assert!(rule.check(&"411001".into(), &form).is_ok());
        assert_eq!(rule.check(&"4110".into(), &form), Err("bad pin".to_string()));
        assert!(rule.check(&411001_i64.into(), &form).is_err());
    }

    #[test]
    fn test_range_is_inclusive() {
        let rule = Rule::range(0.0, 100.0, "out of range");
        let form = FormState::new();
        for ok in ["0", "100", "55.5"] {
            assert!(rule.check(&ok.into(), &form).is_ok(), "{ok} should pass");
        }
        for bad in ["101", "-1", "abc"] {
            assert!(rule.check(&bad.into(), &form).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_one_of_trims_input() {
        let rule = Rule::one_of(["male", "female", "other"], "pick one");
        let form = FormState::new();
        assert!(rule.check(&" female ".into(), &form).is_ok());
        assert!(rule.check(&"unknown".into(), &form).is_err());
    }

    #[test]
    fn test_iso_date() {
        let rule = Rule::iso_date("bad date");
        let form = FormState::new();
        assert!(rule.check(&"2006-02-28".into(), &form).is_ok());
        assert!(rule.check(&"2006-02-30".into(), &form).is_err());
        assert!(rule.check(&"28/02/2006".into(), &form).is_err());
    }

    #[test]
    fn test_switch_requires_selector() {
        let mut cases = BTreeMap::new();
        cases.insert(
            "cgpa".to_string(),
            vec![Rule::range(0.0, 10.0, "CGPA must be between 0 and 10")],
        );
        let rule = Rule::switch("gradeType", cases, "Select a grade type first");

        let unset = FormState::new();
        assert_eq!(
            rule.check(&"9".into(), &unset),
            Err("Select a grade type first".to_string())
        );

        let cgpa = form_with(&[("gradeType", "cgpa")]);
        assert!(rule.check(&"9.4".into(), &cgpa).is_ok());
        assert!(rule.check(&"11".into(), &cgpa).is_err());

        let other = form_with(&[("gradeType", "grade")]);
        assert!(rule.check(&"A+".into(), &other).is_ok());
    }

    #[test]
    fn test_distinct_from_ignores_blank_fields() {
        let rule = Rule::distinct_from(["course"], "must differ");
        assert!(rule.check(&"bsc".into(), &FormState::new()).is_ok());
        assert!(rule
            .check(&"bsc".into(), &form_with(&[("course", "")]))
            .is_ok());
        assert!(rule
            .check(&"bsc".into(), &form_with(&[("course", "bsc")]))
            .is_err());
    }

    #[test]
    fn test_custom_rule() {
        let rule = Rule::custom(|value, _| match value.as_text() {
            Some(s) if s.len() <= 5 => Ok(()),
            _ => Err("too long".to_string()),
        });
        let form = FormState::new();
        assert!(rule.check(&"short".into(), &form).is_ok());
        assert!(rule.check(&"longer".into(), &form).is_err());
        assert_eq!(format!("{rule:?}"), "Custom(..)");
    }
}
