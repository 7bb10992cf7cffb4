//! Shared types for Pawcare components.

pub mod api;
pub mod constants;
pub mod validation;

mod advice;
mod category;
mod dog;
mod error;
mod user;

pub use advice::{
    AdviceCard, AdviceCardFilter, AdviceType, CreateAdviceCardCommand, InvalidAdviceType, Rating,
};
pub use api::{AdviceCardFilterInput, CategoryFilterInput, CreateAdviceCardInput, CreateDogInput};
pub use category::{CategoryCode, CategoryFilter, InvalidCategory, ProblemCategory};
pub use dog::{CreateDogCommand, Dog, EnergyLevel, Gender, InvalidEnergyLevel, InvalidGender};
pub use error::{
    ErrorBody, ErrorCode, ErrorResponse, VALIDATION_FAILED_MESSAGE, ValidationFailure, Violation,
    Violations,
};
pub use user::User;
pub use validation::ValidateFrom;
