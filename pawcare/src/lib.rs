//! Pet-care REST backend: dog profiles, problem categories and advice cards
//! behind a declarative request binding and validation pipeline.

pub mod api;
pub mod binding;
pub mod config;
pub mod error;
pub mod extractors;
pub mod store;

pub const NAME: &str = "PawCare";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
