//! Content-addressed URI normalization
//!
//! Rewrites descriptor and media URIs so they all point at the configured
//! canonical gateway.

use once_cell::sync::Lazy;
use regex::Regex;
use tnft_common::config::EnrichmentConfig;
use tnft_common::Nft;
use tracing::{debug, warn};

use super::error::{EnrichmentError, EnrichmentResult};

/// Captures the scheme plus path prefix, then the final path segment.
static CONTENT_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*://.+/)([^/]+)$").expect("content URI regex is valid")
});

/// Final path segment of a content-addressed URI
pub fn extract_identifier(uri: &str) -> EnrichmentResult<&str> {
    CONTENT_URI_RE
        .captures(uri)
        .and_then(|caps| caps.get(2))
        .map(|identifier| identifier.as_str())
        .ok_or_else(|| EnrichmentError::MalformedUri(uri.to_string()))
}

/// Rewrites URIs onto the canonical gateway
#[derive(Debug, Clone)]
pub struct UriNormalizer {
    gateway: String,
}

impl UriNormalizer {
    pub fn new(config: &EnrichmentConfig) -> Self {
        Self {
            gateway: config.ipfs_gateway.clone(),
        }
    }

    /// True when `uri` sits directly under the gateway path
    pub fn is_canonical(&self, uri: &str) -> bool {
        uri.strip_prefix(self.gateway.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// `<gateway>/<identifier>` for the given URI
    pub fn canonicalize(&self, uri: &str) -> EnrichmentResult<String> {
        let identifier = extract_identifier(uri)?;
        Ok(format!("{}/{}", self.gateway, identifier))
    }

    /// Point the record's content URI at the canonical gateway
    ///
    /// Best effort: a URI that cannot be rewritten leaves the record as it was.
    pub fn normalize_if_needed(&self, nft: Nft) -> Nft {
        let Some(uri) = nft.uri.as_deref() else {
            return nft;
        };
        if self.is_canonical(uri) {
            return nft;
        }

        match self.canonicalize(uri) {
            Ok(canonical) => {
                debug!(nft_id = %nft.id, uri = %canonical, "Content URI rewritten");
                Nft {
                    uri: Some(canonical),
                    ..nft
                }
            }
            Err(e) => {
                warn!(nft_id = %nft.id, error = %e, "Content URI left unchanged");
                nft
            }
        }
    }
}
