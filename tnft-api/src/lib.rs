//! tnft-api library interface
//!
//! NFT metadata service: serves ledger NFT records enriched with serie
//! ranking, creator/owner profiles, remote descriptors and categories.

pub mod api;
pub mod db;
pub mod enrichment;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::enrichment::Enricher;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Enrichment pipeline, configured once at startup
    pub enricher: Arc<Enricher>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, enricher: Arc<Enricher>) -> Self {
        Self {
            db,
            enricher,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::nft_routes())
        .merge(api::category_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
