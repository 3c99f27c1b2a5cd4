//! NFT enrichment pipeline
//!
//! Builds the denormalized view of an NFT record out of independent sources:
//! 1. **uri** - rewrite the content URI onto the canonical gateway (sync)
//! 2. **serie** - rank serie peers and derive statistics
//! 3. **identity** - resolve creator and owner users
//! 4. **remote** - fetch the content descriptor
//! 5. **categories** - resolve classification tags
//!
//! Stages 2-5 run concurrently. Every stage reduces its own failures to a
//! safe default, so [`Enricher::populate`] always returns a record.

pub mod categories;
pub mod error;
pub mod identity;
pub mod remote;
pub mod serie;
pub mod uri;

pub use categories::CategoryDirectory;
pub use error::{Degrade, EnrichmentError, EnrichmentResult};
pub use identity::UserDirectory;
pub use remote::{DocumentTransport, HttpTransport, MetadataFetcher, NftInfo};
pub use serie::{SerieStats, SerieSummary};
pub use uri::UriNormalizer;

use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tnft_common::config::EnrichmentConfig;
use tnft_common::{Category, Nft, QueryContext, User};
use tracing::debug;

/// Composite view of an NFT
///
/// Keys are merged in this order, later keys replacing earlier ones:
/// record fields, serie statistics, `creatorData`, `ownerData`,
/// descriptor fields, `categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnrichedNft(Map<String, Value>);

impl EnrichedNft {
    fn merge(
        nft: &Nft,
        serie: Option<SerieStats>,
        creator: Option<User>,
        owner: Option<User>,
        info: NftInfo,
        categories: Vec<Category>,
    ) -> Self {
        let mut fields = Map::new();

        extend_with(&mut fields, nft);
        if let Some(stats) = serie {
            extend_with(&mut fields, &stats);
        }
        fields.insert("creatorData".to_string(), to_json(&creator));
        fields.insert("ownerData".to_string(), to_json(&owner));
        fields.extend(info);
        fields.insert("categories".to_string(), to_json(&categories));

        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn extend_with<T: Serialize>(fields: &mut Map<String, Value>, value: &T) {
    if let Value::Object(object) = to_json(value) {
        fields.extend(object);
    }
}

/// Enrichment pipeline wired to its collaborators
pub struct Enricher {
    normalizer: UriNormalizer,
    users: Arc<dyn UserDirectory>,
    categories: Arc<dyn CategoryDirectory>,
    fetcher: MetadataFetcher,
}

impl Enricher {
    pub fn new(
        config: &EnrichmentConfig,
        users: Arc<dyn UserDirectory>,
        categories: Arc<dyn CategoryDirectory>,
        transport: Arc<dyn DocumentTransport>,
    ) -> Self {
        Self {
            normalizer: UriNormalizer::new(config),
            users,
            categories,
            fetcher: MetadataFetcher::new(config, transport),
        }
    }

    /// Build the composite view of `nft`
    ///
    /// `snapshot` holds the already loaded records of the NFT's serie (other
    /// series may be mixed in); `ctx` biases ranking and statistics.
    pub async fn populate(&self, nft: &Nft, snapshot: &[Nft], ctx: &QueryContext) -> EnrichedNft {
        let nft = self.normalizer.normalize_if_needed(nft.clone());

        let (serie, creator, owner, info, categories) = tokio::join!(
            async { serie::aggregate_serie(&nft, snapshot, ctx) },
            identity::resolve_creator(self.users.as_ref(), &nft),
            identity::resolve_owner(self.users.as_ref(), &nft),
            self.fetcher.fetch_nft_info(&nft),
            categories::resolve_categories(self.categories.as_ref(), &nft),
        );

        debug!(
            nft_id = %nft.id,
            has_serie = serie.is_some(),
            has_creator = creator.is_some(),
            has_owner = owner.is_some(),
            info_fields = info.len(),
            categories = categories.len(),
            "NFT enriched"
        );

        EnrichedNft::merge(&nft, serie, creator, owner, info, categories)
    }

    /// Enrich a batch concurrently, preserving input order
    ///
    /// `snapshots` maps serie ids to their records; unique items need no entry.
    pub async fn populate_many(
        &self,
        nfts: &[Nft],
        snapshots: &HashMap<String, Vec<Nft>>,
        ctx: &QueryContext,
    ) -> Vec<EnrichedNft> {
        let futures = nfts.iter().map(|nft| {
            let snapshot = snapshots
                .get(&nft.serie_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            self.populate(nft, snapshot, ctx)
        });

        join_all(futures).await
    }
}
