//! Integration tests for tnft-api HTTP endpoints

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tnft_api::api::health::LIVENESS_MESSAGE;
use tnft_api::db::{self, SqliteCategoryDirectory, SqliteUserDirectory};
use tnft_api::enrichment::Enricher;
use tnft_api::{build_router, AppState};
use tnft_common::config::EnrichmentConfig;
use tower::ServiceExt; // for `oneshot`

const DESCRIPTOR_URI: &str = "https://ipfs.ternoa.dev/ipfs/QmDescriptor";

/// Seed a small ledger mirror: serie "42" with three editions and one unique item
async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;

    let mut first = nft("1", "42", "alice", true, "5");
    first.creator = "maker".to_string();
    first.uri = Some("https://cloudflare-ipfs.com/ipfs/QmDescriptor".to_string());
    let mut second = nft("2", "42", "bob", true, "3");
    second.marketplace_id = Some("9".to_string());
    let third = nft("3", "42", "carol", false, "1");
    let unique = nft("4", "0", "alice", false, "8");

    for record in [&first, &second, &third, &unique] {
        db::nfts::upsert_nft(&pool, record).await.unwrap();
    }

    db::users::upsert_user(&pool, &user("maker", "Maker")).await.unwrap();
    db::users::upsert_user(&pool, &user("alice", "Alice")).await.unwrap();
    db::categories::upsert_category(&pool, &category("art", "Art")).await.unwrap();
    db::categories::upsert_category(&pool, &category("music", "Music")).await.unwrap();
    db::categories::link_category(&pool, "1", "art").await.unwrap();

    pool
}

/// Router over the seeded database with a mock descriptor transport
async fn setup_app() -> axum::Router {
    let pool = seeded_pool().await;
    let transport = Arc::new(MockTransport::serving(
        DESCRIPTOR_URI,
        descriptor(
            "https://cloudflare-ipfs.com/ipfs/QmMedia",
            "https://cloudflare-ipfs.com/ipfs/QmSecret",
        ),
    ));

    let enricher = Enricher::new(
        &EnrichmentConfig::default(),
        Arc::new(SqliteUserDirectory::new(pool.clone())),
        Arc::new(SqliteCategoryDirectory::new(pool.clone())),
        transport,
    );

    build_router(AppState::new(pool, Arc::new(enricher)))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

// =============================================================================
// Liveness / health
// =============================================================================

#[tokio::test]
async fn test_liveness_returns_static_text() {
    let (status, body) = get(setup_app().await, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), LIVENESS_MESSAGE);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(setup_app().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "tnft-api");
    assert!(body["uptime_seconds"].is_number());
}

// =============================================================================
// NFT detail
// =============================================================================

#[tokio::test]
async fn test_nft_detail_enriched() {
    let (status, body) = get_json(setup_app().await, "/api/nfts/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "1");
    assert_eq!(body["uri"], DESCRIPTOR_URI);
    assert_eq!(body["totalNft"], 3);
    assert_eq!(body["totalListedNft"], 2);
    assert_eq!(body["smallestPrice"], "3");
    assert_eq!(body["serieData"][0]["id"], "2");
    assert_eq!(body["creatorData"]["name"], "Maker");
    assert_eq!(body["ownerData"]["name"], "Alice");
    assert_eq!(body["media"]["url"], "https://ipfs.ternoa.dev/ipfs/QmMedia");
    assert_eq!(body["cryptedMedia"]["url"], "https://ipfs.ternoa.dev/ipfs/QmSecret");
    assert_eq!(body["categories"], json!([{ "code": "art", "name": "Art", "description": null }]));
}

#[tokio::test]
async fn test_nft_detail_with_filters() {
    let (status, body) = get_json(
        setup_app().await,
        "/api/nfts/3?marketplaceId=9&owner=carol&noSeriesData=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serieData"], json!([]));
    assert_eq!(body["totalNft"], 3);
    assert_eq!(body["totalListedInMarketplace"], 1);
    assert_eq!(body["totalOwnedByRequestingUser"], 1);
    assert_eq!(body["totalOwnedListedByRequestingUser"], 0);
    // descriptor unavailable for this record
    assert!(body.get("title").is_none());
    assert_eq!(body["ownerData"], Value::Null);
}

#[tokio::test]
async fn test_nft_detail_not_found() {
    let (status, body) = get_json(setup_app().await, "/api/nfts/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// NFT listing
// =============================================================================

#[tokio::test]
async fn test_list_all_nfts() {
    let (status, body) = get_json(setup_app().await, "/api/nfts").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);

    let unique = &items[3];
    assert_eq!(unique["id"], "4");
    assert_eq!(unique["totalNft"], 1);
    assert_eq!(unique["serieData"][0]["id"], "4");
}

#[tokio::test]
async fn test_list_filtered_by_owner() {
    let (status, body) = get_json(setup_app().await, "/api/nfts?owner=alice").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(body[0]["totalOwnedByRequestingUser"], 1);
}

#[tokio::test]
async fn test_list_marketplace_ranking() {
    let (status, body) = get_json(setup_app().await, "/api/nfts?listed=true&marketplaceId=9").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "2");
    assert_eq!(items[0]["serieData"][0]["marketplaceId"], "9");
    assert_eq!(items[0]["totalListedInMarketplace"], 1);
}

#[tokio::test]
async fn test_list_rejects_bad_flag() {
    let (status, body) = get_json(setup_app().await, "/api/nfts?listed=maybe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("maybe"));
}

#[tokio::test]
async fn test_list_accepts_count_flags() {
    let (status, body) = get_json(setup_app().await, "/api/nfts?listed=1").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2"]);

    let (status, body) = get_json(setup_app().await, "/api/nfts?listed=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_nft_detail_rejects_bad_flag() {
    let (status, body) = get_json(setup_app().await, "/api/nfts/1?noSeriesData=perhaps").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_nft_detail_accepts_numeric_suppress_flag() {
    let (status, body) = get_json(setup_app().await, "/api/nfts/1?noSeriesData=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serieData"], json!([]));
    assert_eq!(body["totalNft"], 3);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_list_categories() {
    let (status, body) = get_json(setup_app().await, "/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["code"], "art");
}
