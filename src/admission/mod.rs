//! Student admission application form
//!
//! Four steps: personal information, academic background, course
//! selection and document upload. [`registry`] builds the rule registry the
//! wizard controller runs on.

mod options;

pub use options::*;

use crate::validation::{DocumentPolicy, FieldSpec, Rule, RuleRegistry, StepDefinition, MIB};
use chrono::{Datelike, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

/// Storage key drafts of this form are saved under
pub const DRAFT_KEY: &str = "admissionFormDraft";

/// Earliest accepted board examination year
pub const MIN_BOARD_YEAR: i32 = 2000;

/// Earliest accepted entrance examination year
pub const MIN_ENTRANCE_YEAR: i32 = 2020;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid mobile regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PIN_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid PIN code regex"));

const MOBILE_MESSAGE: &str = "Please enter a valid 10-digit mobile number";
const DOCUMENT_FORMATS: [&str; 4] = [".pdf", ".jpg", ".jpeg", ".png"];

/// Registry for the admission form, with year limits ending at the current year
pub fn registry() -> Arc<RuleRegistry> {
    Arc::new(build_registry(Utc::now().year()))
}

/// Registry with an explicit upper bound for year fields
pub fn build_registry(max_year: i32) -> RuleRegistry {
    RuleRegistry::new()
        .with_fields(personal_fields())
        .with_fields(academic_fields(max_year))
        .with_fields(course_fields())
        .with_document(
            DocumentPolicy::new("photo", "Passport Size Photo", [".jpg", ".jpeg", ".png"], 2 * MIB)
                .required(),
        )
        .with_document(document("class10Certificate", "Class 10th Certificate").required())
        .with_document(document("class12Certificate", "Class 12th Certificate").required())
        .with_document(document("entranceCertificate", "Entrance Exam Certificate"))
        .with_document(document("casteCertificate", "Caste Certificate"))
        .with_document(document("incomeCertificate", "Income Certificate"))
        .with_document(document("aadharCard", "Aadhar Card").required())
        .with_document(document("transferCertificate", "Transfer Certificate"))
        .with_step(
            StepDefinition::new("Personal Info")
                .require_fields(&[
                    "firstName",
                    "lastName",
                    "dateOfBirth",
                    "gender",
                    "fatherName",
                    "motherName",
                    "category",
                    "mobile",
                    "email",
                    "guardianMobile",
                    "addressLine1",
                    "city",
                    "state",
                    "pinCode",
                ])
                .optional_fields(&["bloodGroup", "alternateMobile", "addressLine2"]),
        )
        .with_step(
            StepDefinition::new("Academic")
                .require_fields(&[
                    "class10Board",
                    "class10School",
                    "class10Year",
                    "class10GradeType",
                    "class10Marks",
                    "class12Board",
                    "class12School",
                    "class12Stream",
                    "class12Year",
                    "class12GradeType",
                    "class12Marks",
                ])
                .optional_fields(&[
                    "entranceExam",
                    "entranceRollNumber",
                    "entranceScore",
                    "entranceYear",
                    "additionalQualifications",
                ]),
        )
        .with_step(
            StepDefinition::new("Course Selection")
                .require_fields(&["course", "specialization", "admissionType", "preferredCampus"])
                .optional_fields(&[
                    "secondPreference",
                    "thirdPreference",
                    "courseReason",
                    "careerGoals",
                ]),
        )
        .with_step(StepDefinition::new("Documents").require_documents(&[
            "photo",
            "class10Certificate",
            "class12Certificate",
            "aadharCard",
        ]))
}

fn document(key: &str, label: &str) -> DocumentPolicy {
    DocumentPolicy::new(key, label, DOCUMENT_FORMATS, 5 * MIB)
}

fn personal_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("firstName", "First name").required("First name is required"),
        FieldSpec::text("lastName", "Last name").required("Last name is required"),
        FieldSpec::date("dateOfBirth", "Date of birth")
            .required("Date of birth is required")
            .rule(Rule::iso_date("Please enter a valid date")),
        FieldSpec::choice("gender", "Gender")
            .required("Gender is required")
            .rule(Rule::one_of(GENDERS.iter().copied(), "Please select a valid gender")),
        FieldSpec::text("fatherName", "Father's name").required("Father's name is required"),
        FieldSpec::text("motherName", "Mother's name").required("Mother's name is required"),
        FieldSpec::choice("bloodGroup", "Blood group").rule(Rule::one_of(
            BLOOD_GROUPS.iter().copied(),
            "Please select a valid blood group",
        )),
        FieldSpec::choice("category", "Category")
            .required("Category is required")
            .rule(Rule::one_of(
                CATEGORIES.iter().copied(),
                "Please select a valid category",
            )),
        FieldSpec::text("mobile", "Mobile number")
            .required("Mobile number is required")
            .rule(Rule::pattern(&MOBILE_RE, MOBILE_MESSAGE)),
        FieldSpec::text("email", "Email address")
            .required("Email address is required")
            .rule(Rule::pattern(&EMAIL_RE, "Please enter a valid email address")),
        FieldSpec::text("alternateMobile", "Alternate mobile number")
            .rule(Rule::pattern(&MOBILE_RE, MOBILE_MESSAGE)),
        FieldSpec::text("guardianMobile", "Guardian's mobile number")
            .required("Guardian's mobile number is required")
            .rule(Rule::pattern(&MOBILE_RE, MOBILE_MESSAGE)),
        FieldSpec::text("addressLine1", "Address").required("Address is required"),
        FieldSpec::text("addressLine2", "Address line 2"),
        FieldSpec::text("city", "City").required("City is required"),
        FieldSpec::choice("state", "State")
            .required("State is required")
            .rule(Rule::one_of(STATES.iter().copied(), "Please select a valid state")),
        FieldSpec::text("pinCode", "PIN code")
            .required("PIN code is required")
            .rule(Rule::pattern(&PIN_CODE_RE, "Please enter a valid 6-digit PIN code")),
    ]
}

fn academic_fields(max_year: i32) -> Vec<FieldSpec> {
    let mut fields = Vec::new();
    for class in ["10", "12"] {
        let prefix = format!("class{class}");
        let ordinal = format!("Class {class}th");
        fields.push(
            FieldSpec::choice(&format!("{prefix}Board"), &format!("{ordinal} board"))
                .required(format!("{ordinal} board is required"))
                .rule(Rule::one_of(BOARDS.iter().copied(), "Please select a valid board")),
        );
        fields.push(
            FieldSpec::text(&format!("{prefix}School"), &format!("{ordinal} school name"))
                .required(format!("{ordinal} school name is required")),
        );
        fields.push(
            FieldSpec::number(&format!("{prefix}Year"), &format!("{ordinal} year"))
                .required(format!("{ordinal} year is required"))
                .rule(year_rule(MIN_BOARD_YEAR, max_year)),
        );
        fields.push(
            FieldSpec::choice(&format!("{prefix}GradeType"), "Grade type")
                .required("Grade type is required")
                .rule(Rule::one_of(
                    GRADE_TYPES.iter().copied(),
                    "Please select a valid grade type",
                )),
        );
        fields.push(
            FieldSpec::number(&format!("{prefix}Marks"), &format!("{ordinal} marks"))
                .required(format!("{ordinal} marks are required"))
                .rule(marks_rule(&format!("{prefix}GradeType"))),
        );
    }

    fields.push(
        FieldSpec::choice("class12Stream", "Class 12th stream")
            .required("Class 12th stream is required")
            .rule(Rule::one_of(STREAMS.iter().copied(), "Please select a valid stream")),
    );
    fields.push(FieldSpec::choice("entranceExam", "Entrance exam").rule(Rule::one_of(
        ENTRANCE_EXAMS.iter().copied(),
        "Please select a valid entrance exam",
    )));
    fields.push(FieldSpec::text("entranceRollNumber", "Entrance roll number"));
    fields.push(
        FieldSpec::number("entranceScore", "Entrance score")
            .rule(Rule::range(0.0, f64::MAX, "Please enter a valid score")),
    );
    fields.push(
        FieldSpec::number("entranceYear", "Entrance year")
            .rule(year_rule(MIN_ENTRANCE_YEAR, max_year)),
    );
    fields.push(FieldSpec::text(
        "additionalQualifications",
        "Additional qualifications",
    ));
    fields
}

fn year_rule(min: i32, max: i32) -> Rule {
    Rule::range(f64::from(min), f64::from(max), "Please enter a valid year")
}

/// Marks are bounded by the grade type chosen next to them
fn marks_rule(grade_type_field: &str) -> Rule {
    let mut cases = BTreeMap::new();
    cases.insert(
        "percentage".to_string(),
        vec![Rule::range(0.0, 100.0, "Percentage must be between 0 and 100")],
    );
    cases.insert(
        "cgpa".to_string(),
        vec![Rule::range(0.0, 10.0, "CGPA must be between 0 and 10")],
    );
    cases.insert("grade".to_string(), Vec::new());
    Rule::switch(grade_type_field, cases, "Select a grade type first")
}

fn course_fields() -> Vec<FieldSpec> {
    let specializations = COURSES
        .iter()
        .map(|course| {
            (
                course.to_string(),
                vec![Rule::one_of(
                    specializations_for(course).iter().copied(),
                    "Specialization is not offered for the selected course",
                )],
            )
        })
        .collect::<BTreeMap<_, _>>();

    vec![
        FieldSpec::choice("course", "Course")
            .required("Course selection is required")
            .rule(Rule::one_of(COURSES.iter().copied(), "Please select a valid course"))
            .resets("specialization"),
        FieldSpec::choice("specialization", "Specialization")
            .required("Specialization is required")
            .rule(Rule::switch("course", specializations, "Select a course first")),
        FieldSpec::choice("admissionType", "Admission type")
            .required("Admission type is required")
            .rule(Rule::one_of(
                ADMISSION_TYPES.iter().copied(),
                "Please select a valid admission type",
            )),
        FieldSpec::choice("preferredCampus", "Preferred campus")
            .required("Preferred campus is required")
            .rule(Rule::one_of(CAMPUSES.iter().copied(), "Please select a valid campus")),
        FieldSpec::choice("secondPreference", "Second preference")
            .rule(Rule::one_of(COURSES.iter().copied(), "Please select a valid course"))
            .rule(Rule::distinct_from(
                ["course"],
                "Second preference must differ from your selected course",
            )),
        FieldSpec::choice("thirdPreference", "Third preference")
            .rule(Rule::one_of(COURSES.iter().copied(), "Please select a valid course"))
            .rule(Rule::distinct_from(
                ["course", "secondPreference"],
                "Third preference must differ from your other choices",
            )),
        FieldSpec::text("courseReason", "Reason for choosing this course"),
        FieldSpec::text("careerGoals", "Career goals"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FieldValue, FormState};

    fn check(registry: &RuleRegistry, form: &FormState, name: &str, value: &str) -> bool {
        registry
            .field(name)
            .map(|spec| spec.check(Some(&FieldValue::from(value)), form).valid)
            .unwrap_or(false)
    }

    #[test]
    fn test_registry_has_four_steps_without_dangling_names() {
        let registry = build_registry(2025);
        assert_eq!(registry.step_count(), 4);
        assert!(registry.dangling_references().is_empty());
        let titles: Vec<&str> = registry.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Personal Info", "Academic", "Course Selection", "Documents"]
        );
    }

    #[test]
    fn test_mobile_boundaries() {
        let registry = build_registry(2025);
        let form = FormState::new();
        assert!(check(&registry, &form, "mobile", "9876543210"));
        assert!(!check(&registry, &form, "mobile", "987654321"));
        assert!(!check(&registry, &form, "mobile", "98765432100"));
        assert!(!check(&registry, &form, "mobile", "98765abcde"));
    }

    #[test]
    fn test_percentage_marks_boundaries() {
        let registry = build_registry(2025);
        let mut form = FormState::new();
        form.set("class10GradeType", "percentage".into());
        assert!(check(&registry, &form, "class10Marks", "0"));
        assert!(check(&registry, &form, "class10Marks", "100"));
        assert!(!check(&registry, &form, "class10Marks", "101"));
        assert!(!check(&registry, &form, "class10Marks", "-1"));
    }

    #[test]
    fn test_cgpa_marks_depend_on_grade_type() {
        let registry = build_registry(2025);
        let mut form = FormState::new();
        form.set("class12GradeType", "cgpa".into());
        assert!(check(&registry, &form, "class12Marks", "9.2"));
        assert!(!check(&registry, &form, "class12Marks", "92"));
    }

    #[test]
    fn test_year_upper_bound_follows_registry() {
        let registry = build_registry(2025);
        let form = FormState::new();
        assert!(check(&registry, &form, "class10Year", "2000"));
        assert!(check(&registry, &form, "class10Year", "2025"));
        assert!(!check(&registry, &form, "class10Year", "1999"));
        assert!(!check(&registry, &form, "class10Year", "2026"));
        assert!(!check(&registry, &form, "entranceYear", "2019"));
    }

    #[test]
    fn test_email_and_pin_code() {
        let registry = build_registry(2025);
        let form = FormState::new();
        assert!(check(&registry, &form, "email", "aarav@example.in"));
        assert!(!check(&registry, &form, "email", "not-an-email"));
        assert!(check(&registry, &form, "pinCode", "560001"));
        assert!(!check(&registry, &form, "pinCode", "56001"));
    }

    #[test]
    fn test_specialization_must_match_course() {
        let registry = build_registry(2025);
        let mut form = FormState::new();
        assert!(!check(&registry, &form, "specialization", "mechanical"));

        form.set("course", "btech".into());
        assert!(check(&registry, &form, "specialization", "mechanical"));
        assert!(!check(&registry, &form, "specialization", "marketing"));
    }

    #[test]
    fn test_course_resets_specialization() {
        let registry = build_registry(2025);
        let course = registry.field("course").unwrap();
        assert_eq!(course.dependents(), ["specialization".to_string()]);
    }

    #[test]
    fn test_preferences_must_differ() {
        let registry = build_registry(2025);
        let mut form = FormState::new();
        form.set("course", "bsc".into());
        form.set("secondPreference", "bca".into());
        assert!(!check(&registry, &form, "secondPreference", "bsc"));
        assert!(check(&registry, &form, "secondPreference", "bca"));
        assert!(!check(&registry, &form, "thirdPreference", "bca"));
        assert!(check(&registry, &form, "thirdPreference", "mba"));
    }

    #[test]
    fn test_optional_alternate_mobile_still_checked_when_present() {
        let registry = build_registry(2025);
        let form = FormState::new();
        assert!(check(&registry, &form, "alternateMobile", ""));
        assert!(!check(&registry, &form, "alternateMobile", "12345"));
    }

    #[test]
    fn test_document_policies() {
        let registry = build_registry(2025);
        let required: Vec<&str> = registry
            .documents()
            .filter(|d| d.required)
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(
            required,
            vec!["aadharCard", "class10Certificate", "class12Certificate", "photo"]
        );
        assert_eq!(registry.document("photo").map(|d| d.max_bytes), Some(2 * MIB));
        assert_eq!(
            registry.document("incomeCertificate").map(|d| d.max_bytes),
            Some(5 * MIB)
        );
    }
}
