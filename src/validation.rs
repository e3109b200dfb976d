//! Field validation for project form input.
//!
//! [`validate`] checks a single value against optional constraints; an absent
//! constraint is never checked. [`validate_project_input`] applies the
//! configured [`FormRules`] to the three raw form fields and either returns the
//! typed values or every field that failed.

use serde::{Deserialize, Serialize};
use std::{fmt, num::IntErrorKind};
use thiserror::Error;

/// A raw value under validation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{}", text),
            Self::Number(number) => write!(f, "{}", number),
        }
    }
}

/// A value plus the constraints it must satisfy.
///
/// Length bounds only apply to text and range bounds only apply to numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub value: Value,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validatable {
    pub fn text(value: impl Into<String>) -> Self {
        Self::unconstrained(Value::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Self::unconstrained(Value::Number(value))
    }

    fn unconstrained(value: Value) -> Self {
        Self {
            value,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Lists a reason for every declared constraint the value breaks
    pub fn violations(&self) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.required && self.value.to_string().trim().is_empty() {
            reasons.push("is required".to_string());
        }

        match &self.value {
            Value::Text(text) => {
                let len = text.chars().count();
                if let Some(min_length) = self.min_length {
                    if len < min_length {
                        reasons.push(format!("must be at least {} characters", min_length));
                    }
                }
                if let Some(max_length) = self.max_length {
                    if len > max_length {
                        reasons.push(format!("must be at most {} characters", max_length));
                    }
                }
            }
            Value::Number(number) => {
                // NaN fails both comparisons
                if let Some(min) = self.min {
                    if !(*number >= min) {
                        reasons.push(format!("must be at least {}", min));
                    }
                }
                if let Some(max) = self.max {
                    if !(*number <= max) {
                        reasons.push(format!("must be at most {}", max));
                    }
                }
            }
        }

        reasons
    }
}

/// Returns true when every declared constraint passes
pub fn validate(input: &Validatable) -> bool {
    input.violations().is_empty()
}

/// Serializable constraint set for one form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Constraints {
    pub fn apply(&self, value: Value) -> Validatable {
        Validatable {
            value,
            required: self.required,
            min_length: self.min_length,
            max_length: self.max_length,
            min: self.min,
            max: self.max,
        }
    }

    /// Checks that lower bounds do not exceed upper bounds
    pub fn is_consistent(&self) -> bool {
        let lengths_ok = match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        let range_ok = match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        lengths_ok && range_ok
    }
}

/// Constraints for the project form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRules {
    pub title: Constraints,
    pub description: Constraints,
    pub people: Constraints,
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            title: Constraints {
                required: true,
                ..Constraints::default()
            },
            description: Constraints {
                required: true,
                min_length: Some(5),
                ..Constraints::default()
            },
            people: Constraints {
                required: true,
                min: Some(1.0),
                max: Some(5.0),
                ..Constraints::default()
            },
        }
    }
}

/// Form field a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    People,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Description => write!(f, "description"),
            Self::People => write!(f, "people"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Rejected form input, listing each failing field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid input: {}", describe(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.iter().any(|err| err.field == field)
    }
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Form input that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProjectInput {
    pub title: String,
    pub description: String,
    pub people: u32,
}

/// Validates raw form fields against `rules`.
///
/// The people field is read as a whole number; blank input counts as zero so
/// range constraints still apply to it.
pub fn validate_project_input(
    title: &str,
    description: &str,
    people_raw: &str,
    rules: &FormRules,
) -> Result<ValidProjectInput, ValidationError> {
    let mut fields = Vec::new();
    let mut collect = |field: Field, reasons: Vec<String>| {
        fields.extend(reasons.into_iter().map(|reason| FieldError { field, reason }));
    };

    collect(
        Field::Title,
        rules
            .title
            .apply(Value::Text(title.to_string()))
            .violations(),
    );
    collect(
        Field::Description,
        rules
            .description
            .apply(Value::Text(description.to_string()))
            .violations(),
    );

    let people_trimmed = people_raw.trim();
    let people = if people_trimmed.is_empty() {
        Ok(0)
    } else {
        people_trimmed.parse::<u32>()
    };
    match &people {
        Ok(count) => collect(
            Field::People,
            rules
                .people
                .apply(Value::Number(f64::from(*count)))
                .violations(),
        ),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
            let mut reasons = rules
                .people
                .apply(Value::Number(f64::INFINITY))
                .violations();
            if reasons.is_empty() {
                reasons.push(format!("must be at most {}", u32::MAX));
            }
            collect(Field::People, reasons);
        }
        Err(_) => collect(Field::People, vec!["must be a whole number".to_string()]),
    }

    if !fields.is_empty() {
        return Err(ValidationError { fields });
    }

    Ok(ValidProjectInput {
        title: title.to_string(),
        description: description.to_string(),
        people: people.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_constraints_are_not_checked() {
        assert!(validate(&Validatable::text("")));
        assert!(validate(&Validatable::number(-100.0)));
    }

    #[test]
    fn test_required_trims_whitespace() {
        assert!(!validate(&Validatable::text("   ").required()));
        assert!(validate(&Validatable::text(" x ").required()));
        assert!(validate(&Validatable::number(0.0).required()));
    }

    #[test]
    fn test_length_bounds_apply_to_text_only() {
        assert!(validate(&Validatable::text("abcde").min_length(5)));
        assert!(!validate(&Validatable::text("abcd").min_length(5)));
        assert!(!validate(&Validatable::text("abcdef").max_length(5)));
        assert!(validate(&Validatable::number(1.0).min_length(5)));
    }

    #[test]
    fn test_range_bounds_apply_to_numbers_only() {
        let people = |n: f64| Validatable::number(n).required().min(1.0).max(5.0);
        assert!(validate(&people(1.0)));
        assert!(validate(&people(5.0)));
        assert!(!validate(&people(0.0)));
        assert!(!validate(&people(6.0)));
        assert!(!validate(&people(f64::NAN)));
        assert!(validate(&Validatable::text("zzz").min(10.0)));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(validate(&Validatable::text("héllo").max_length(5)));
    }

    #[test]
    fn test_project_input_boundaries() {
        let rules = FormRules::default();

        assert!(validate_project_input("T", "12345", "1", &rules).is_ok());
        assert!(validate_project_input("T", "12345", "5", &rules).is_ok());

        let err = validate_project_input("T", "1234", "3", &rules).unwrap_err();
        assert!(err.has_field(Field::Description));
        assert!(!err.has_field(Field::People));

        assert!(validate_project_input("T", "12345", "0", &rules).is_err());
        assert!(validate_project_input("T", "12345", "6", &rules).is_err());
    }

    #[test]
    fn test_project_input_collects_every_failure() {
        let err = validate_project_input("  ", "abc", "", &FormRules::default()).unwrap_err();
        assert!(err.has_field(Field::Title));
        assert!(err.has_field(Field::Description));
        assert!(err.has_field(Field::People));
        assert!(err.to_string().starts_with("Invalid input: title is required"));
    }

    #[test]
    fn test_project_input_rejects_non_numeric_people() {
        let err = validate_project_input("T", "12345", "two", &FormRules::default()).unwrap_err();
        assert_eq!(
            err.fields,
            vec![FieldError {
                field: Field::People,
                reason: "must be a whole number".to_string(),
            }]
        );
        assert!(validate_project_input("T", "12345", "2.5", &FormRules::default()).is_err());
    }

    #[test]
    fn test_project_input_reports_huge_people_as_out_of_range() {
        let rules = FormRules::default();
        let err = validate_project_input("T", "12345", "99999999999", &rules).unwrap_err();
        assert_eq!(
            err.fields,
            vec![FieldError {
                field: Field::People,
                reason: "must be at most 5".to_string(),
            }]
        );

        let unbounded = FormRules {
            people: Constraints {
                required: true,
                ..Constraints::default()
            },
            ..rules
        };
        let err = validate_project_input("T", "12345", "99999999999", &unbounded).unwrap_err();
        assert_eq!(err.fields[0].reason, format!("must be at most {}", u32::MAX));
    }

    #[test]
    fn test_project_input_returns_typed_values() {
        let valid = validate_project_input("Launch", "Ship it soon", " 3 ", &FormRules::default())
            .unwrap();
        assert_eq!(
            valid,
            ValidProjectInput {
                title: "Launch".to_string(),
                description: "Ship it soon".to_string(),
                people: 3,
            }
        );
    }

    #[test]
    fn test_constraints_consistency() {
        assert!(FormRules::default().people.is_consistent());
        let broken = Constraints {
            min: Some(5.0),
            max: Some(1.0),
            ..Constraints::default()
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_form_rules_deserialize_partial() {
        let rules: FormRules =
            serde_json::from_str(r#"{ "people": { "required": true, "max": 10 } }"#).unwrap();
        assert_eq!(rules.people.max, Some(10.0));
        assert_eq!(rules.people.min, None);
        assert_eq!(rules.description.min_length, Some(5));
    }
}
