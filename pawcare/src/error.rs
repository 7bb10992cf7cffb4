use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use common::{ErrorBody, ErrorCode, ErrorResponse, ValidationFailure};

use crate::binding::{ConfigurationError, DeserializationError, ResolveError};
use crate::store::StoreError;

/// Every failure a handler can surface to a client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(ValidationFailure),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Evalidation,
            Self::Deserialization(_) | Self::BadRequest(_) => ErrorCode::Ebadrequest,
            Self::Unauthorized => ErrorCode::Eunauthorized,
            Self::NotFound(_) => ErrorCode::Enotfound,
            Self::Conflict(_) => ErrorCode::Econflict,
            Self::Internal(_) => ErrorCode::Einternal,
        }
    }

    #[must_use]
    pub const fn to_status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::Evalidation | ErrorCode::Ebadrequest => StatusCode::BAD_REQUEST,
            ErrorCode::Eunauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Enotfound => StatusCode::NOT_FOUND,
            ErrorCode::Econflict => StatusCode::CONFLICT,
            ErrorCode::Einternal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Generic boundary: code and message only, never a violation list.
    #[must_use]
    pub fn render_json(&self) -> Response {
        let status = self.to_status_code();
        (status, Json(ErrorBody::new(self.code(), &self.to_string()))).into_response()
    }
}

/// The one place a validation failure becomes a response. The mapping keeps
/// every violation, in order.
#[must_use]
pub fn translate_validation_failure(failure: ValidationFailure) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(failure))).into_response()
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Validation(failure) => Self::Validation(failure),
            ResolveError::Deserialization(e) => Self::Deserialization(e),
        }
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(e: ConfigurationError) -> Self {
        Self::Internal(format!("Binding configuration error: {e}"))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UserNotFound(_)
            | StoreError::DogNotFound(_)
            | StoreError::UnknownCategory(_) => Self::NotFound(e.to_string()),
            StoreError::DuplicateCategory(_) => Self::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(failure) => translate_validation_failure(failure),
            other => other.render_json(),
        }
    }
}
