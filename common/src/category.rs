use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::api::CategoryFilterInput;
use crate::constants::{MAX_CATEGORY_CODE_LENGTH, MAX_CATEGORY_NAME_LENGTH};
use crate::validation::{Constrained, FieldRules, FieldValue, ensure_valid};
use crate::{ValidateFrom, ValidationFailure};

#[derive(Debug, Clone)]
pub struct InvalidCategory(pub String);

impl fmt::Display for InvalidCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidCategory {}

/// Stable identifier of a problem category, e.g. `separation_anxiety`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryCode(String);

impl CategoryCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = InvalidCategory;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        if code.is_empty() {
            return Err(InvalidCategory("Category code cannot be empty".to_string()));
        }
        if code.len() > MAX_CATEGORY_CODE_LENGTH {
            return Err(InvalidCategory(format!(
                "Category code must be at most {MAX_CATEGORY_CODE_LENGTH} characters"
            )));
        }
        if !code.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
            return Err(InvalidCategory(
                "Code must contain only lowercase letters and underscores".to_string(),
            ));
        }
        Ok(Self(code))
    }
}

impl TryFrom<&str> for CategoryCode {
    type Error = InvalidCategory;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::try_from(code.to_string())
    }
}

impl FromStr for CategoryCode {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CategoryCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CategoryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_from(s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemCategory {
    pub id: Uuid,
    pub code: CategoryCode,
    pub name: String,
    pub priority: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProblemCategory {
    pub fn new(
        code: CategoryCode,
        name: &str,
        priority: i32,
        active: bool,
    ) -> Result<Self, InvalidCategory> {
        let length = name.chars().count();
        if length == 0 || length > MAX_CATEGORY_NAME_LENGTH {
            return Err(InvalidCategory(format!(
                "Category name must be between 1 and {MAX_CATEGORY_NAME_LENGTH} characters"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            code,
            name: name.to_string(),
            priority,
            active,
            created_at: Utc::now(),
        })
    }
}

/// The category filter declares no constraints. A bad `active` flag is
/// rejected while the query is coerced, before validation runs.
impl Constrained for CategoryFilterInput {
    const RULES: &'static [FieldRules] = &[];

    fn field_value(&self, _field: &str) -> FieldValue<'_> {
        FieldValue::Absent
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub active: Option<bool>,
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, category: &ProblemCategory) -> bool {
        self.active.is_none_or(|active| active == category.active)
    }
}

impl ValidateFrom for CategoryFilter {
    type Input = CategoryFilterInput;

    fn validate_from(input: CategoryFilterInput) -> Result<Self, ValidationFailure> {
        ensure_valid(&input)?;
        Ok(Self {
            active: input.active,
        })
    }
}
