//! Remote NFT descriptor fetcher
//!
//! Downloads the JSON descriptor behind an NFT's content URI and points its
//! media locations at the canonical gateway.
//!
//! Rewrite rules:
//! - `media.url` is rewritten only when it is an `/ipfs` path on another gateway
//! - `cryptedMedia.url` is rewritten whenever it is not already canonical

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tnft_common::config::EnrichmentConfig;
use tnft_common::Nft;
use tracing::debug;

use super::error::{Degrade, EnrichmentError, EnrichmentResult};
use super::uri::UriNormalizer;

/// Path marker identifying content-addressed media
const IPFS_PATH_MARKER: &str = "/ipfs";

const USER_AGENT: &str = concat!("tnft-api/", env!("CARGO_PKG_VERSION"));

/// Fetched descriptor fields, empty when unavailable
pub type NftInfo = Map<String, Value>;

/// Transport able to GET a JSON document within a time budget
#[async_trait]
pub trait DocumentTransport: Send + Sync {
    async fn fetch_json(&self, uri: &str, timeout: Duration) -> EnrichmentResult<Value>;
}

/// HTTP transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new() -> tnft_common::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let http_client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| tnft_common::Error::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

fn transport_error(uri: &str, timeout: Duration, e: reqwest::Error) -> EnrichmentError {
    if e.is_timeout() {
        EnrichmentError::Timeout(timeout)
    } else {
        EnrichmentError::Fetch(format!("{}: {}", uri, e))
    }
}

#[async_trait]
impl DocumentTransport for HttpTransport {
    async fn fetch_json(&self, uri: &str, timeout: Duration) -> EnrichmentResult<Value> {
        let response = self
            .http_client
            .get(uri)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(uri, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Fetch(format!("{} returned {}", uri, status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| transport_error(uri, timeout, e))
    }
}

/// Fetches and normalizes NFT descriptors
#[derive(Clone)]
pub struct MetadataFetcher {
    transport: Arc<dyn DocumentTransport>,
    normalizer: UriNormalizer,
    timeout: Duration,
}

impl MetadataFetcher {
    pub fn new(config: &EnrichmentConfig, transport: Arc<dyn DocumentTransport>) -> Self {
        Self {
            transport,
            normalizer: UriNormalizer::new(config),
            timeout: config.fetch_timeout,
        }
    }

    /// Descriptor of `nft` with rewritten media URLs, or an empty object
    pub async fn fetch_nft_info(&self, nft: &Nft) -> NftInfo {
        self.try_fetch(nft).await.or_degrade("remote", &nft.id)
    }

    async fn try_fetch(&self, nft: &Nft) -> EnrichmentResult<NftInfo> {
        let uri = nft
            .uri
            .as_deref()
            .ok_or_else(|| EnrichmentError::Fetch("record has no content URI".to_string()))?;

        let value = tokio::time::timeout(self.timeout, self.transport.fetch_json(uri, self.timeout))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))??;

        let Value::Object(mut info) = value else {
            return Err(EnrichmentError::Fetch(format!("{}: descriptor is not an object", uri)));
        };

        self.rewrite_media(&mut info)?;
        debug!(nft_id = %nft.id, "Descriptor fetched");
        Ok(info)
    }

    fn rewrite_media(&self, info: &mut NftInfo) -> EnrichmentResult<()> {
        let media = media_url(info, "media")?;
        let crypted = media_url(info, "cryptedMedia")?;

        if media.contains(IPFS_PATH_MARKER) && !self.normalizer.is_canonical(&media) {
            set_media_url(info, "media", self.normalizer.canonicalize(&media)?);
        }
        if !self.normalizer.is_canonical(&crypted) {
            set_media_url(info, "cryptedMedia", self.normalizer.canonicalize(&crypted)?);
        }
        Ok(())
    }
}

fn media_url(info: &NftInfo, key: &str) -> EnrichmentResult<String> {
    info.get(key)
        .and_then(|media| media.get("url"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| EnrichmentError::Fetch(format!("descriptor has no {}.url", key)))
}

fn set_media_url(info: &mut NftInfo, key: &str, url: String) {
    if let Some(Value::Object(media)) = info.get_mut(key) {
        media.insert("url".to_string(), Value::String(url));
    }
}
