//! Classification tag resolution

use async_trait::async_trait;
use tnft_common::{Category, Nft};

use super::error::{Degrade, EnrichmentError};

/// Category lookup keyed by NFT id
#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    /// `Ok(None)` when the NFT has no categories
    async fn find_categories_for_nft(&self, nft_id: &str) -> tnft_common::Result<Option<Vec<Category>>>;
}

/// Categories of `nft`, empty when none are known or the lookup fails
pub async fn resolve_categories(directory: &dyn CategoryDirectory, nft: &Nft) -> Vec<Category> {
    directory
        .find_categories_for_nft(&nft.id)
        .await
        .map(Option::unwrap_or_default)
        .map_err(|e| EnrichmentError::Lookup(format!("categories: {}", e)))
        .or_degrade("categories", &nft.id)
}
