use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::CreateDogInput;
use crate::constants::{
    MAX_AGE_MONTHS, MAX_BREED_LENGTH, MAX_DOG_NAME_LENGTH, MAX_WEIGHT_KG, MIN_WEIGHT_KG,
};
use crate::error::VALIDATION_FAILED_MESSAGE;
use crate::validation::{Constrained, Constraint, FieldRules, FieldValue, ensure_valid};
use crate::{ValidateFrom, ValidationFailure};

const GENDER_CHOICES: &[&str] = &["male", "female"];
const ENERGY_LEVEL_CHOICES: &[&str] = &["very_low", "low", "medium", "high", "very_high"];

const AGE_RANGE_MESSAGE: &str = "Age must be between 0 and 300 months.";
const WEIGHT_RANGE_MESSAGE: &str = "Weight must be between 0.01 and 200 kg.";
const GENDER_CHOICE_MESSAGE: &str = "Gender must be either \"male\" or \"female\".";
const ENERGY_LEVEL_CHOICE_MESSAGE: &str =
    "Energy level must be one of: very_low, low, medium, high, very_high.";

#[derive(Debug, Clone)]
pub struct InvalidGender(pub String);

impl fmt::Display for InvalidGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidGender {}

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(InvalidGender(GENDER_CHOICE_MESSAGE.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvalidEnergyLevel(pub String);

impl fmt::Display for InvalidEnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidEnergyLevel {}

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryLow => write!(f, "very_low"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very_high"),
        }
    }
}

impl FromStr for EnergyLevel {
    type Err = InvalidEnergyLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_low" => Ok(Self::VeryLow),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very_high" => Ok(Self::VeryHigh),
            _ => Err(InvalidEnergyLevel(ENERGY_LEVEL_CHOICE_MESSAGE.to_string())),
        }
    }
}

impl Constrained for CreateDogInput {
    const RULES: &'static [FieldRules] = &[
        FieldRules {
            field: "name",
            constraints: &[
                Constraint::NotBlank {
                    message: "Name cannot be blank.",
                },
                Constraint::Length {
                    min: Some(1),
                    max: Some(MAX_DOG_NAME_LENGTH),
                    min_message: "Name must be at least 1 character long.",
                    max_message: "Name cannot be longer than 100 characters.",
                },
            ],
        },
        FieldRules {
            field: "breed",
            constraints: &[
                Constraint::NotBlank {
                    message: "Breed cannot be blank.",
                },
                Constraint::Length {
                    min: None,
                    max: Some(MAX_BREED_LENGTH),
                    min_message: "",
                    max_message: "Breed cannot be longer than 100 characters.",
                },
            ],
        },
        FieldRules {
            field: "ageMonths",
            constraints: &[
                Constraint::NotNull {
                    message: "Age in months is required.",
                },
                Constraint::IntegerRange {
                    min: 0,
                    max: MAX_AGE_MONTHS,
                    message: AGE_RANGE_MESSAGE,
                },
            ],
        },
        FieldRules {
            field: "gender",
            constraints: &[
                Constraint::NotBlank {
                    message: "Gender cannot be blank.",
                },
                Constraint::Choice {
                    choices: GENDER_CHOICES,
                    message: GENDER_CHOICE_MESSAGE,
                },
            ],
        },
        FieldRules {
            field: "weightKg",
            constraints: &[
                Constraint::NotNull {
                    message: "Weight is required.",
                },
                Constraint::DecimalRange {
                    min: MIN_WEIGHT_KG,
                    max: MAX_WEIGHT_KG,
                    message: WEIGHT_RANGE_MESSAGE,
                },
            ],
        },
        FieldRules {
            field: "energyLevel",
            constraints: &[
                Constraint::NotBlank {
                    message: "Energy level cannot be blank.",
                },
                Constraint::Choice {
                    choices: ENERGY_LEVEL_CHOICES,
                    message: ENERGY_LEVEL_CHOICE_MESSAGE,
                },
            ],
        },
    ];

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "name" => self.name.as_deref().into(),
            "breed" => self.breed.as_deref().into(),
            "ageMonths" => self.age_months.into(),
            "gender" => self.gender.as_deref().into(),
            "weightKg" => self.weight_kg.into(),
            "energyLevel" => self.energy_level.as_deref().into(),
            _ => FieldValue::Absent,
        }
    }
}

/// Validated command to register a dog profile. Only built through [`ValidateFrom`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDogCommand {
    name: String,
    breed: String,
    age_months: u16,
    gender: Gender,
    weight_kg: f64,
    energy_level: EnergyLevel,
}

impl CreateDogCommand {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn breed(&self) -> &str {
        &self.breed
    }

    #[must_use]
    pub const fn age_months(&self) -> u16 {
        self.age_months
    }

    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[must_use]
    pub const fn energy_level(&self) -> EnergyLevel {
        self.energy_level
    }
}

fn rejected(field: &str, message: &str) -> ValidationFailure {
    ValidationFailure::single(VALIDATION_FAILED_MESSAGE, field, message)
}

impl TryFrom<CreateDogInput> for CreateDogCommand {
    type Error = ValidationFailure;

    fn try_from(input: CreateDogInput) -> Result<Self, Self::Error> {
        ensure_valid(&input)?;

        // The table has passed: the conversions below only guard the types.
        let name = input
            .name
            .ok_or_else(|| rejected("name", "Name cannot be blank."))?;
        let breed = input
            .breed
            .ok_or_else(|| rejected("breed", "Breed cannot be blank."))?;
        let age_months = input
            .age_months
            .and_then(|age| u16::try_from(age).ok())
            .ok_or_else(|| rejected("ageMonths", AGE_RANGE_MESSAGE))?;
        let gender = input
            .gender
            .as_deref()
            .unwrap_or_default()
            .parse::<Gender>()
            .map_err(|e| rejected("gender", &e.to_string()))?;
        let weight_kg = input
            .weight_kg
            .ok_or_else(|| rejected("weightKg", "Weight is required."))?;
        let energy_level = input
            .energy_level
            .as_deref()
            .unwrap_or_default()
            .parse::<EnergyLevel>()
            .map_err(|e| rejected("energyLevel", &e.to_string()))?;

        Ok(Self {
            name,
            breed,
            age_months,
            gender,
            weight_kg,
            energy_level,
        })
    }
}

impl ValidateFrom for CreateDogCommand {
    type Input = CreateDogInput;

    fn validate_from(input: CreateDogInput) -> Result<Self, ValidationFailure> {
        Self::try_from(input)
    }
}

/// Persisted dog profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub id: Uuid,
    #[serde(skip)]
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age_months: u16,
    pub gender: Gender,
    pub weight_kg: f64,
    pub energy_level: EnergyLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dog {
    /// Builds a new record for `owner_id` from a validated command.
    #[must_use]
    pub fn from_command(owner_id: Uuid, command: CreateDogCommand, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: command.name,
            breed: command.breed,
            age_months: command.age_months,
            gender: command.gender,
            weight_kg: command.weight_kg,
            energy_level: command.energy_level,
            created_at: now,
            updated_at: now,
        }
    }
}
