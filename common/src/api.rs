//! Loosely typed request inputs.
//!
//! Every field is optional so that absence surfaces as a violation of the
//! constraint table rather than as a deserialization error.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDogInput {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age_months: Option<i64>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub energy_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdviceCardInput {
    pub category_code: Option<String>,
    pub problem_description: Option<String>,
    pub ai_response: Option<String>,
    pub advice_type: Option<String>,
    /// Free-form plan document, kept as JSON.
    pub plan_content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceCardFilterInput {
    pub advice_type: Option<String>,
    pub rated: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryFilterInput {
    pub active: Option<bool>,
}
