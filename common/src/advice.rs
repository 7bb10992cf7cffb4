use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AdviceCardFilterInput, CreateAdviceCardInput};
use crate::constants::MAX_CATEGORY_CODE_LENGTH;
use crate::error::VALIDATION_FAILED_MESSAGE;
use crate::validation::{Constrained, Constraint, FieldRules, FieldValue, ensure_valid, validate};
use crate::{CategoryCode, ValidateFrom, ValidationFailure};

const ADVICE_TYPE_CHOICES: &[&str] = &["quick", "plan_7_days"];
const ADVICE_TYPE_CHOICE_MESSAGE: &str = "Advice type must be one of: quick, plan_7_days.";
const PLAN_REQUIRED_MESSAGE: &str = "A 7-day plan must include plan content.";
const PLAN_FORBIDDEN_MESSAGE: &str = "Quick advice cannot include plan content.";

#[derive(Debug, Clone)]
pub struct InvalidAdviceType(pub String);

impl fmt::Display for InvalidAdviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidAdviceType {}

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum AdviceType {
    #[serde(rename = "quick")]
    Quick,
    #[serde(rename = "plan_7_days")]
    Plan7Days,
}

impl fmt::Display for AdviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quick => write!(f, "quick"),
            Self::Plan7Days => write!(f, "plan_7_days"),
        }
    }
}

impl FromStr for AdviceType {
    type Err = InvalidAdviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(Self::Quick),
            "plan_7_days" => Ok(Self::Plan7Days),
            _ => Err(InvalidAdviceType(ADVICE_TYPE_CHOICE_MESSAGE.to_string())),
        }
    }
}

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Helpful,
    NotHelpful,
}

/// AI-generated advice attached to a dog and a problem category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceCard {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub category_code: CategoryCode,
    pub problem_description: String,
    pub ai_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_content: Option<serde_json::Value>,
    pub advice_type: AdviceType,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
}

impl AdviceCard {
    /// Builds an unrated card for `dog_id` from a validated command.
    #[must_use]
    pub fn from_command(
        dog_id: Uuid,
        command: CreateAdviceCardCommand,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            dog_id,
            category_code: command.category_code,
            problem_description: command.problem_description,
            ai_response: command.ai_response,
            plan_content: command.plan_content,
            advice_type: command.advice_type,
            rating: None,
            created_at: now,
        }
    }
}

impl Constrained for CreateAdviceCardInput {
    const RULES: &'static [FieldRules] = &[
        FieldRules {
            field: "categoryCode",
            constraints: &[
                Constraint::NotBlank {
                    message: "Category code cannot be blank.",
                },
                Constraint::Length {
                    min: None,
                    max: Some(MAX_CATEGORY_CODE_LENGTH),
                    min_message: "",
                    max_message: "Category code cannot be longer than 50 characters.",
                },
            ],
        },
        FieldRules {
            field: "problemDescription",
            constraints: &[Constraint::NotBlank {
                message: "Problem description cannot be blank.",
            }],
        },
        FieldRules {
            field: "aiResponse",
            constraints: &[Constraint::NotBlank {
                message: "AI response cannot be blank.",
            }],
        },
        FieldRules {
            field: "adviceType",
            constraints: &[
                Constraint::NotBlank {
                    message: "Advice type cannot be blank.",
                },
                Constraint::Choice {
                    choices: ADVICE_TYPE_CHOICES,
                    message: ADVICE_TYPE_CHOICE_MESSAGE,
                },
            ],
        },
    ];

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "categoryCode" => self.category_code.as_deref().into(),
            "problemDescription" => self.problem_description.as_deref().into(),
            "aiResponse" => self.ai_response.as_deref().into(),
            "adviceType" => self.advice_type.as_deref().into(),
            _ => FieldValue::Absent,
        }
    }
}

/// Validated command to record advice for a dog. Only built through [`ValidateFrom`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAdviceCardCommand {
    category_code: CategoryCode,
    problem_description: String,
    ai_response: String,
    advice_type: AdviceType,
    plan_content: Option<serde_json::Value>,
}

impl CreateAdviceCardCommand {
    #[must_use]
    pub const fn category_code(&self) -> &CategoryCode {
        &self.category_code
    }

    #[must_use]
    pub fn problem_description(&self) -> &str {
        &self.problem_description
    }

    #[must_use]
    pub fn ai_response(&self) -> &str {
        &self.ai_response
    }

    #[must_use]
    pub const fn advice_type(&self) -> AdviceType {
        self.advice_type
    }

    #[must_use]
    pub const fn plan_content(&self) -> Option<&serde_json::Value> {
        self.plan_content.as_ref()
    }
}

fn rejected(field: &str, message: &str) -> ValidationFailure {
    ValidationFailure::single(VALIDATION_FAILED_MESSAGE, field, message)
}

impl ValidateFrom for CreateAdviceCardCommand {
    type Input = CreateAdviceCardInput;

    /// Runs the table, then the rules that span fields. Their violations
    /// follow the table's, so the order stays stable.
    fn validate_from(input: CreateAdviceCardInput) -> Result<Self, ValidationFailure> {
        let mut violations = validate(&input);

        let category_code = input
            .category_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(CategoryCode::try_from)
            .transpose();
        if let Err(e) = &category_code {
            violations.add("categoryCode", &e.to_string());
        }

        match (input.advice_type.as_deref(), &input.plan_content) {
            (Some("plan_7_days"), None) => violations.add("planContent", PLAN_REQUIRED_MESSAGE),
            (Some("quick"), Some(_)) => violations.add("planContent", PLAN_FORBIDDEN_MESSAGE),
            _ => {}
        }
        violations.into_result(VALIDATION_FAILED_MESSAGE)?;

        // Everything has passed: the conversions below only guard the types.
        let category_code = category_code
            .ok()
            .flatten()
            .ok_or_else(|| rejected("categoryCode", "Category code cannot be blank."))?;
        let problem_description = input
            .problem_description
            .ok_or_else(|| rejected("problemDescription", "Problem description cannot be blank."))?;
        let ai_response = input
            .ai_response
            .ok_or_else(|| rejected("aiResponse", "AI response cannot be blank."))?;
        let advice_type = input
            .advice_type
            .as_deref()
            .unwrap_or_default()
            .parse::<AdviceType>()
            .map_err(|e| rejected("adviceType", &e.to_string()))?;

        Ok(Self {
            category_code,
            problem_description,
            ai_response,
            advice_type,
            plan_content: input.plan_content,
        })
    }
}

impl Constrained for AdviceCardFilterInput {
    const RULES: &'static [FieldRules] = &[FieldRules {
        field: "adviceType",
        constraints: &[Constraint::Choice {
            choices: ADVICE_TYPE_CHOICES,
            message: ADVICE_TYPE_CHOICE_MESSAGE,
        }],
    }];

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "adviceType" => self.advice_type.as_deref().into(),
            _ => FieldValue::Absent,
        }
    }
}

/// Narrowing applied when listing the cards of one dog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdviceCardFilter {
    pub advice_type: Option<AdviceType>,
    pub rated: Option<bool>,
}

impl AdviceCardFilter {
    #[must_use]
    pub fn matches(&self, card: &AdviceCard) -> bool {
        self.advice_type.is_none_or(|t| t == card.advice_type)
            && self.rated.is_none_or(|rated| rated == card.rating.is_some())
    }
}

impl ValidateFrom for AdviceCardFilter {
    type Input = AdviceCardFilterInput;

    fn validate_from(input: AdviceCardFilterInput) -> Result<Self, ValidationFailure> {
        ensure_valid(&input)?;

        let advice_type = input
            .advice_type
            .as_deref()
            .map(str::parse::<AdviceType>)
            .transpose()
            .map_err(|e| {
                ValidationFailure::single(VALIDATION_FAILED_MESSAGE, "adviceType", &e.to_string())
            })?;

        Ok(Self {
            advice_type,
            rated: input.rated,
        })
    }
}
