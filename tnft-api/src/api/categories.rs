//! Category listing

use axum::{extract::State, routing::get, Json, Router};
use tnft_common::Category;

use crate::{db, ApiResult, AppState};

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(db::categories::list_categories(&state.db).await?))
}

pub fn category_routes() -> Router<AppState> {
    Router::new().route("/api/categories", get(list_categories))
}
