use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::{Bound, PathParam};
use common::{CreateDogCommand, User};

use super::AppState;

// Register a dog for the caller
async fn create_dog(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Bound(command): Bound<CreateDogCommand>,
) -> impl IntoResponse {
    match state.store.write().await.create_dog(user.id, command) {
        Ok(dog) => {
            info!(
                user.email = %user.email,
                dog.id = %dog.id,
                dog.name = %dog.name,
                "dog created"
            );
            (StatusCode::CREATED, Json(dog)).into_response()
        }
        Err(e) => {
            error!(
                user.email = %user.email,
                error = %e,
                "failed to create dog"
            );
            ApiError::from(e).into_response()
        }
    }
}

// List the caller's dogs
async fn list_dogs(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    let dogs = state.store.read().await.list_dogs(user.id);
    (StatusCode::OK, Json(dogs)).into_response()
}

// Inspect one dog
async fn get_dog(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParam(id): PathParam<Uuid>,
) -> impl IntoResponse {
    match state.store.read().await.get_dog(user.id, id) {
        Ok(dog) => (StatusCode::OK, Json(dog)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/dogs", get(list_dogs).post(create_dog))
        .route("/dogs/{id}", get(get_dog))
}
