use crate::error::VALIDATION_FAILED_MESSAGE;
use crate::{ValidationFailure, Violation, Violations};

/// Trait for validation:
/// 1. Input is deserialized with loose types (every field optional, no content checks)
/// 2. The constraint table of the input is evaluated, accumulating every violation
/// 3. Only a fully valid input is converted to the domain type
pub trait ValidateFrom: Sized {
    /// The type to deserialize from.
    type Input: serde::de::DeserializeOwned;

    fn validate_from(input: Self::Input) -> Result<Self, ValidationFailure>;
}

/// View of one candidate field, as seen by the constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Integer(i64),
    Decimal(f64),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Text)
    }
}

impl From<Option<i64>> for FieldValue<'_> {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Absent, Self::Integer)
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Absent, Self::Decimal)
    }
}

/// Declarative rule attached to a field.
///
/// Only `NotBlank` and `NotNull` look at absent values, every other
/// constraint skips them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    NotBlank {
        message: &'static str,
    },
    NotNull {
        message: &'static str,
    },
    /// Length in characters.
    Length {
        min: Option<usize>,
        max: Option<usize>,
        min_message: &'static str,
        max_message: &'static str,
    },
    IntegerRange {
        min: i64,
        max: i64,
        message: &'static str,
    },
    DecimalRange {
        min: f64,
        max: f64,
        message: &'static str,
    },
    Choice {
        choices: &'static [&'static str],
        message: &'static str,
    },
}

impl Constraint {
    /// Returns the violation message when `value` breaks the constraint.
    #[must_use]
    pub fn check(&self, value: FieldValue<'_>) -> Option<&'static str> {
        match (*self, value) {
            (Self::NotBlank { message }, FieldValue::Absent | FieldValue::Text("")) => {
                Some(message)
            }
            (Self::NotNull { message }, FieldValue::Absent) => Some(message),
            (
                Self::Length {
                    min,
                    max,
                    min_message,
                    max_message,
                },
                FieldValue::Text(text),
            ) => {
                let count = text.chars().count();
                if min.is_some_and(|min| count < min) {
                    Some(min_message)
                } else if max.is_some_and(|max| count > max) {
                    Some(max_message)
                } else {
                    None
                }
            }
            (Self::IntegerRange { min, max, message }, FieldValue::Integer(v)) => {
                (!(min..=max).contains(&v)).then_some(message)
            }
            (Self::DecimalRange { min, max, message }, FieldValue::Decimal(v)) => {
                (!(min..=max).contains(&v)).then_some(message)
            }
            (Self::Choice { choices, message }, FieldValue::Text(text)) => {
                (!choices.contains(&text)).then_some(message)
            }
            _ => None,
        }
    }
}

/// The ordered rule set of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

/// A candidate type with a static constraint table.
pub trait Constrained {
    /// Fields in declaration order. Violations come out in this order.
    const RULES: &'static [FieldRules];

    fn field_value(&self, field: &str) -> FieldValue<'_>;
}

/// Evaluates every constraint of every field; never stops at the first failure.
pub fn validate<T: Constrained>(candidate: &T) -> Violations {
    T::RULES
        .iter()
        .flat_map(|rules| {
            let value = candidate.field_value(rules.field);
            rules
                .constraints
                .iter()
                .filter_map(move |c| c.check(value))
                .map(move |message| Violation::new(rules.field, message))
        })
        .collect()
}

/// Runs [`validate`] and turns a non-empty result into a [`ValidationFailure`].
pub fn ensure_valid<T: Constrained>(candidate: &T) -> Result<(), ValidationFailure> {
    validate(candidate).into_result(VALIDATION_FAILED_MESSAGE)
}
