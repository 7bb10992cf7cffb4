use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::binding::{Bindable, ConfigurationError, Resolver};
use crate::error::ApiError;

/// Handler parameter resolved through the binding registry: read from the
/// source its descriptor names, deserialized, then validated.
#[derive(Debug)]
pub struct Bound<T>(pub T);

impl<T, S> FromRequest<S> for Bound<T>
where
    S: Send + Sync,
    T: Bindable + Send,
    Resolver: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = Resolver::from_ref(state);
        // A router only mounts `Bound<T>` for parameters checked at startup.
        let value = resolver
            .resolve::<T, S>(req, state)
            .await?
            .ok_or(ConfigurationError::MissingDescriptor(T::PARAMETER))?;
        Ok(Self(value))
    }
}

/// Path segment parameter. Not part of the registry.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid path parameter: {e}")))?;
        Ok(Self(value))
    }
}
