//! Enrichment failure taxonomy
//!
//! None of these ever leave the enrichment pipeline: every stage reduces its
//! failures to a safe default through [`Degrade`].

use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Enrichment stage error
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// URI does not have the `<scheme>://<host-path>/<identifier>` shape
    #[error("Malformed content URI: {0}")]
    MalformedUri(String),

    /// Directory lookup failed
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Remote descriptor could not be fetched or understood
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Remote descriptor fetch exceeded its time budget
    #[error("Fetch timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Serie statistics could not be computed
    #[error("Aggregation failed: {0}")]
    Aggregation(String),
}

pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Collapse a stage result into its safe default, logging the diagnostic
pub trait Degrade<T> {
    fn or_degrade(self, stage: &'static str, nft_id: &str) -> T;
}

impl<T: Default> Degrade<T> for EnrichmentResult<T> {
    fn or_degrade(self, stage: &'static str, nft_id: &str) -> T {
        self.unwrap_or_else(|e| {
            warn!(stage, nft_id, error = %e, "Enrichment stage degraded to default");
            T::default()
        })
    }
}
