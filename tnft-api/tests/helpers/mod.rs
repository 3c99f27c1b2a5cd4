//! Shared fixtures for tnft-api integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tnft_api::enrichment::{
    CategoryDirectory, DocumentTransport, EnrichmentError, EnrichmentResult, Enricher,
    UserDirectory,
};
use tnft_common::config::EnrichmentConfig;
use tnft_common::{Category, Nft, User};

/// In-memory user directory
#[derive(Default)]
pub struct MockUsers {
    pub users: HashMap<String, User>,
    pub fail: bool,
}

impl MockUsers {
    pub fn with(users: &[User]) -> Self {
        Self {
            users: users
                .iter()
                .map(|user| (user.wallet_id.clone(), user.clone()))
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            users: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl UserDirectory for MockUsers {
    async fn find_user(&self, wallet_id: &str) -> tnft_common::Result<Option<User>> {
        if self.fail {
            return Err(tnft_common::Error::Unavailable("user directory down".to_string()));
        }
        Ok(self.users.get(wallet_id).cloned())
    }
}

/// In-memory category directory
#[derive(Default)]
pub struct MockCategories {
    pub by_nft: HashMap<String, Vec<Category>>,
    pub fail: bool,
}

#[async_trait]
impl CategoryDirectory for MockCategories {
    async fn find_categories_for_nft(&self, nft_id: &str) -> tnft_common::Result<Option<Vec<Category>>> {
        if self.fail {
            return Err(tnft_common::Error::Unavailable("category directory down".to_string()));
        }
        Ok(self.by_nft.get(nft_id).cloned())
    }
}

/// Transport serving fixed documents keyed by URI, optionally slowly
#[derive(Default)]
pub struct MockTransport {
    pub documents: HashMap<String, Value>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl MockTransport {
    pub fn serving(uri: &str, document: Value) -> Self {
        let mut documents = HashMap::new();
        documents.insert(uri.to_string(), document);
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentTransport for MockTransport {
    async fn fetch_json(&self, uri: &str, _timeout: Duration) -> EnrichmentResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| EnrichmentError::Fetch(format!("{} returned 404 Not Found", uri)))
    }
}

pub fn user(wallet_id: &str, name: &str) -> User {
    User {
        wallet_id: wallet_id.to_string(),
        name: name.to_string(),
        picture: None,
        twitter_name: None,
        custom_url: None,
        verified: true,
    }
}

pub fn category(code: &str, name: &str) -> Category {
    Category {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
    }
}

pub fn nft(id: &str, serie: &str, owner: &str, listed: bool, price: &str) -> Nft {
    let mut nft = Nft::new(id, serie, owner, "creator-wallet");
    nft.listed = listed;
    nft.price = price.to_string();
    nft.price_tiime = "0".to_string();
    nft
}

pub fn descriptor(media: &str, crypted: &str) -> Value {
    json!({
        "title": "Genesis",
        "description": "First of its kind",
        "media": { "url": media },
        "cryptedMedia": { "url": crypted }
    })
}

pub fn enricher(
    users: MockUsers,
    categories: MockCategories,
    transport: Arc<MockTransport>,
    config: &EnrichmentConfig,
) -> Enricher {
    Enricher::new(config, Arc::new(users), Arc::new(categories), transport)
}

/// Single-connection in-memory database with the service schema
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    tnft_api::db::init_tables(&pool).await.expect("schema");
    pool
}
