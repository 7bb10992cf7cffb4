//! Request binding pipeline: which parameter reads which part of the request,
//! how the raw payload becomes a candidate, and how the candidate is validated.

mod adapter;
mod payload;
mod registry;
mod resolver;

pub use adapter::from_query;
pub use payload::{QueryValue, RawPayload, RawQuery};
pub use registry::{
    BindingDescriptor, BindingRegistry, BindingSource, ConfigurationError, ParameterDecl,
};
pub use resolver::{Bindable, ResolveError, Resolver};

/// The payload could not be turned into the target shape. No violations exist
/// because no candidate was ever constructed.
#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    #[error("Failed to read request body: {0}")]
    Body(String),
    #[error("Malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid query string: {0}")]
    Query(String),
    #[error("Parameter '{parameter}' is bound to the {expected} but the payload came from the {found}")]
    SourceMismatch {
        parameter: &'static str,
        expected: BindingSource,
        found: BindingSource,
    },
}
