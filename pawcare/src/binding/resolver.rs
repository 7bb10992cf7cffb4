use std::sync::Arc;

use axum::extract::Request;
use tracing::debug;

use common::{ValidateFrom, ValidationFailure};

use super::{BindingDescriptor, BindingRegistry, DeserializationError, RawPayload};

/// A validated type that a handler receives through the binding pipeline.
pub trait Bindable: ValidateFrom {
    /// Registry key of the handler parameter this type is bound to.
    const PARAMETER: &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

/// Per-request orchestration of registry lookup, deserialization and validation.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<BindingRegistry>,
}

impl Resolver {
    #[must_use]
    pub fn new(registry: BindingRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Resolves `T` from `req`, or returns `Ok(None)` when the parameter has no
    /// descriptor and belongs to another binding mechanism.
    pub async fn resolve<T, S>(&self, req: Request, state: &S) -> Result<Option<T>, ResolveError>
    where
        T: Bindable,
        S: Send + Sync,
    {
        let Some(descriptor) = self.registry.describe(T::PARAMETER) else {
            return Ok(None);
        };

        let payload = RawPayload::extract(descriptor.source(), req, state).await?;
        Self::resolve_payload(descriptor, &payload).map(Some)
    }

    /// Deserializes then validates an already extracted payload. Validation never
    /// runs on a payload that failed to deserialize.
    pub fn resolve_payload<T: ValidateFrom>(
        descriptor: &BindingDescriptor,
        payload: &RawPayload,
    ) -> Result<T, ResolveError> {
        if payload.source() != descriptor.source() {
            return Err(DeserializationError::SourceMismatch {
                parameter: descriptor.parameter(),
                expected: descriptor.source(),
                found: payload.source(),
            }
            .into());
        }

        let candidate: T::Input = payload.deserialize().inspect_err(|e| {
            debug!(
                parameter = descriptor.parameter(),
                source = %descriptor.source(),
                error = %e,
                "payload rejected before validation"
            );
        })?;

        T::validate_from(candidate).map_err(|failure| {
            debug!(
                parameter = descriptor.parameter(),
                target = descriptor.target_type(),
                violations = failure.violations().len(),
                "candidate rejected by validation"
            );
            ResolveError::Validation(failure)
        })
    }
}
