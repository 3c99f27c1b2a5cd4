//! NFT listing and detail endpoints
//!
//! Both endpoints return enriched records. Serie snapshots are loaded here,
//! once per request, and handed to the enrichment pipeline.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use tnft_common::models::{deserialize_flag, deserialize_optional_flag};
use tnft_common::{Nft, QueryContext};
use tracing::{info, warn};

use crate::db::nfts::{self, NftFilter};
use crate::enrichment::EnrichedNft;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for GET /api/nfts
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNftsQuery {
    pub owner: Option<String>,
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub listed: Option<bool>,
    pub marketplace_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub no_series_data: bool,
}

impl ListNftsQuery {
    fn filter(&self) -> NftFilter {
        NftFilter {
            owner: self.owner.clone(),
            creator: self.creator.clone(),
            listed: self.listed,
            marketplace_id: self.marketplace_id.clone(),
        }
    }

    fn context(&self) -> QueryContext {
        QueryContext {
            marketplace_id: self.marketplace_id.clone(),
            owner: self.owner.clone(),
            no_series_data: self.no_series_data,
        }
    }
}

/// Serie snapshots for `records`; a failed load only costs the serie statistics
async fn load_snapshots(state: &AppState, records: &[Nft]) -> HashMap<String, Vec<Nft>> {
    let serie_ids: Vec<String> = records.iter().map(|nft| nft.serie_id.clone()).collect();

    match nfts::load_series_snapshot(&state.db, &serie_ids).await {
        Ok(snapshots) => snapshots,
        Err(e) => {
            warn!(error = %e, "Serie snapshot unavailable");
            HashMap::new()
        }
    }
}

/// GET /api/nfts
pub async fn list_nfts(
    State(state): State<AppState>,
    query: Result<Query<ListNftsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EnrichedNft>>> {
    let Query(query) = query?;
    let records = nfts::list_nfts(&state.db, &query.filter()).await?;
    let snapshots = load_snapshots(&state, &records).await;

    let enriched = state
        .enricher
        .populate_many(&records, &snapshots, &query.context())
        .await;

    info!(count = enriched.len(), "NFT listing served");
    Ok(Json(enriched))
}

/// GET /api/nfts/:id
pub async fn get_nft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: Result<Query<QueryContext>, QueryRejection>,
) -> ApiResult<Json<EnrichedNft>> {
    let Query(ctx) = ctx?;
    let record = nfts::get_nft(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("NFT {}", id)))?;

    let snapshots = load_snapshots(&state, std::slice::from_ref(&record)).await;
    let snapshot = snapshots
        .get(&record.serie_id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Ok(Json(state.enricher.populate(&record, snapshot, &ctx).await))
}

pub fn nft_routes() -> Router<AppState> {
    Router::new()
        .route("/api/nfts", get(list_nfts))
        .route("/api/nfts/:id", get(get_nft))
}
