use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Summary message carried by every validation failure raised on request input.
pub const VALIDATION_FAILED_MESSAGE: &str = "Invalid input data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Eunauthorized,
    Enotfound,
    Econflict,
    Ebadrequest,
    Evalidation,
    Einternal,
}

const ERROR_CODES: &[&str] = &[
    "unauthorized",
    "not_found",
    "conflict",
    "bad_request",
    "validation_failed",
    "internal",
];

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eunauthorized => "unauthorized",
            Self::Enotfound => "not_found",
            Self::Econflict => "conflict",
            Self::Ebadrequest => "bad_request",
            Self::Evalidation => "validation_failed",
            Self::Einternal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unauthorized" => Ok(Self::Eunauthorized),
            "not_found" => Ok(Self::Enotfound),
            "conflict" => Ok(Self::Econflict),
            "bad_request" => Ok(Self::Ebadrequest),
            "validation_failed" => Ok(Self::Evalidation),
            "internal" => Ok(Self::Einternal),
            _ => Err(()),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ErrorCodeVisitor;

        impl Visitor<'_> for ErrorCodeVisitor {
            type Value = ErrorCode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid error code string")
            }

            fn visit_str<E>(self, value: &str) -> Result<ErrorCode, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map_err(|()| de::Error::unknown_variant(value, ERROR_CODES))
            }
        }

        deserializer.deserialize_str(ErrorCodeVisitor)
    }
}

/// A single constraint failure tied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered accumulator of violations. Entries are never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.push(Violation::new(field, message));
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Turns the accumulated violations into a failure, or `Ok` when there are none.
    pub fn into_result(self, message: &str) -> Result<(), ValidationFailure> {
        match ValidationFailure::new(message, self.0) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One or more constraint failures on an otherwise well-formed candidate.
///
/// The violation list is never empty: the only constructor refuses an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    message: String,
    violations: Vec<Violation>,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(message: &str, violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        Some(Self {
            message: message.to_string(),
            violations,
        })
    }

    /// Failure with a single violation.
    #[must_use]
    pub fn single(message: &str, field: &str, violation: &str) -> Self {
        Self {
            message: message.to_string(),
            violations: vec![Violation::new(field, violation)],
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} violations)", self.message, self.violations.len())
    }
}

impl std::error::Error for ValidationFailure {}

/// Client-visible payload for a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCode,
    pub message: String,
    pub violations: Vec<Violation>,
}

impl From<ValidationFailure> for ErrorResponse {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            error: ErrorCode::Evalidation,
            message: failure.message,
            violations: failure.violations,
        }
    }
}

/// Client-visible payload for every other error kind. Carries no violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: ErrorCode, message: &str) -> Self {
        Self {
            error,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::Eunauthorized.to_string(), "unauthorized");
        assert_eq!(ErrorCode::Enotfound.to_string(), "not_found");
        assert_eq!(ErrorCode::Econflict.to_string(), "conflict");
        assert_eq!(ErrorCode::Ebadrequest.to_string(), "bad_request");
        assert_eq!(ErrorCode::Evalidation.to_string(), "validation_failed");
        assert_eq!(ErrorCode::Einternal.to_string(), "internal");
    }

    #[test]
    fn test_error_code_from_str() {
        assert_eq!(
            ErrorCode::from_str("validation_failed"),
            Ok(ErrorCode::Evalidation)
        );
        assert_eq!(ErrorCode::from_str("not_found"), Ok(ErrorCode::Enotfound));
        assert_eq!(ErrorCode::from_str("unknown"), Err(()));
    }

    #[test]
    fn test_error_code_rejects_unknown_string() {
        let result = serde_json::from_str::<ErrorCode>("\"teapot\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_never_empty() {
        assert!(ValidationFailure::new("Invalid input data", Vec::new()).is_none());
        assert!(Violations::new().into_result("Invalid input data").is_ok());
    }

    #[test]
    fn test_violations_keep_order_and_duplicates() {
        let mut violations = Violations::new();
        violations.add("name", "Name cannot be blank.");
        violations.add("name", "Name must be at least 1 character long.");
        violations.add("gender", "Gender cannot be blank.");

        let failure = violations.into_result("Invalid input data").unwrap_err();
        let fields: Vec<&str> = failure
            .violations()
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "name", "gender"]);
        assert_eq!(failure.message(), "Invalid input data");
    }

    #[test]
    fn test_error_response_from_failure_is_lossless() {
        let failure = ValidationFailure::new(
            "Invalid input data",
            vec![
                Violation::new("ageMonths", "Age must be between 0 and 300 months."),
                Violation::new("weightKg", "Weight must be between 0.01 and 200 kg."),
            ],
        )
        .unwrap();

        let response = ErrorResponse::from(failure.clone());
        assert_eq!(response.error, ErrorCode::Evalidation);
        assert_eq!(response.message, "Invalid input data");
        assert_eq!(response.violations, failure.violations());
    }

    #[test]
    fn test_error_response_json_shape() {
        let failure = ValidationFailure::single("Invalid input data", "name", "Name cannot be blank.");
        let json = serde_json::to_value(ErrorResponse::from(failure)).unwrap();

        assert_eq!(json["error"], "validation_failed");
        assert_eq!(json["message"], "Invalid input data");
        assert_eq!(json["violations"][0]["field"], "name");
        assert_eq!(json["violations"][0]["message"], "Name cannot be blank.");
    }

    #[test]
    fn test_error_body_has_no_violations() {
        let json = serde_json::to_value(ErrorBody::new(ErrorCode::Ebadrequest, "Malformed JSON"))
            .unwrap();
        assert_eq!(json["error"], "bad_request");
        assert!(json.get("violations").is_none());
    }
}
