//! Creator / owner resolution against the user directory

use async_trait::async_trait;
use tnft_common::{Nft, User};
use tracing::debug;

use super::error::{Degrade, EnrichmentError};

/// User directory keyed by ledger wallet id
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when no user is registered for `wallet_id`
    async fn find_user(&self, wallet_id: &str) -> tnft_common::Result<Option<User>>;
}

async fn resolve(
    directory: &dyn UserDirectory,
    wallet_id: &str,
    stage: &'static str,
    nft_id: &str,
) -> Option<User> {
    let user = directory
        .find_user(wallet_id)
        .await
        .map_err(|e| EnrichmentError::Lookup(format!("user {}: {}", wallet_id, e)))
        .or_degrade(stage, nft_id);

    if user.is_none() {
        debug!(stage, nft_id, wallet_id, "No user registered");
    }
    user
}

pub async fn resolve_creator(directory: &dyn UserDirectory, nft: &Nft) -> Option<User> {
    resolve(directory, &nft.creator, "creator", &nft.id).await
}

pub async fn resolve_owner(directory: &dyn UserDirectory, nft: &Nft) -> Option<User> {
    resolve(directory, &nft.owner, "owner", &nft.id).await
}
