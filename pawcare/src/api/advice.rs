use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::{Bound, PathParam};
use common::{AdviceCardFilter, CreateAdviceCardCommand, User};

use super::AppState;

// List the advice cards of one dog, optionally narrowed by type and rating
async fn list_advice_cards(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParam(dog_id): PathParam<Uuid>,
    Bound(filter): Bound<AdviceCardFilter>,
) -> impl IntoResponse {
    match state
        .store
        .read()
        .await
        .list_advice_cards(user.id, dog_id, &filter)
    {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(e) => {
            warn!(
                user.email = %user.email,
                dog.id = %dog_id,
                error = %e,
                "advice cards unavailable"
            );
            ApiError::from(e).into_response()
        }
    }
}

// Record advice generated for one of the caller's dogs
async fn create_advice_card(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParam(dog_id): PathParam<Uuid>,
    Bound(command): Bound<CreateAdviceCardCommand>,
) -> impl IntoResponse {
    match state
        .store
        .write()
        .await
        .create_advice_card(user.id, dog_id, command)
    {
        Ok(card) => {
            info!(
                user.email = %user.email,
                dog.id = %dog_id,
                card.id = %card.id,
                card.category = %card.category_code,
                "advice card created"
            );
            (StatusCode::CREATED, Json(card)).into_response()
        }
        Err(e) => {
            warn!(
                user.email = %user.email,
                dog.id = %dog_id,
                error = %e,
                "failed to create advice card"
            );
            ApiError::from(e).into_response()
        }
    }
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route(
        "/dogs/{id}/advice-cards",
        get(list_advice_cards).post(create_advice_card),
    )
}
