use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::extractors::Bound;
use common::CategoryFilter;

use super::AppState;

async fn list_categories(
    State(state): State<AppState>,
    Bound(filter): Bound<CategoryFilter>,
) -> impl IntoResponse {
    let categories = state.store.read().await.list_categories(&filter);
    (StatusCode::OK, Json(categories)).into_response()
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}
