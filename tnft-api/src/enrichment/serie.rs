//! Serie aggregation
//!
//! Ranks the records sharing an NFT's serie and derives listing, ownership
//! and price statistics from that ranking.
//!
//! Ranking order:
//! 1. listed peers first
//! 2. peers on the requested marketplace first (only when one is requested)
//! 3. price ascending (numeric)
//! 4. priceTiime ascending (numeric)
//!
//! `smallestPrice` is the price of the first ranked peer, so it is the lowest
//! price among listed peers whenever any peer is listed, not the global
//! minimum over the serie.

use serde::Serialize;
use std::cmp::Ordering;
use tnft_common::{Nft, QueryContext};

use super::error::{Degrade, EnrichmentError, EnrichmentResult};

/// Per-peer entry of `serieData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerieSummary {
    pub id: String,
    pub owner: String,
    pub listed: bool,
    pub price: String,
    pub price_tiime: String,
    pub marketplace_id: Option<String>,
}

impl From<&Nft> for SerieSummary {
    fn from(nft: &Nft) -> Self {
        Self {
            id: nft.id.clone(),
            owner: nft.owner.clone(),
            listed: nft.listed,
            price: nft.price.clone(),
            price_tiime: nft.price_tiime.clone(),
            marketplace_id: nft.marketplace_id.clone(),
        }
    }
}

/// Ranked peers and derived statistics for one NFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerieStats {
    pub serie_data: Vec<SerieSummary>,
    pub total_nft: usize,
    pub total_listed_nft: usize,
    pub total_listed_in_marketplace: usize,
    pub total_owned_by_requesting_user: usize,
    pub total_owned_listed_by_requesting_user: usize,
    pub smallest_price: String,
    pub smallest_price_tiime: String,
}

/// Peer with its sort keys parsed up front
struct RankedPeer<'a> {
    nft: &'a Nft,
    in_marketplace: bool,
    price: f64,
    price_tiime: f64,
}

fn parse_price(raw: &str, field: &str, nft_id: &str) -> EnrichmentResult<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            EnrichmentError::Aggregation(format!("NFT {} has non-numeric {}: {:?}", nft_id, field, raw))
        })
}

fn rank(a: &RankedPeer<'_>, b: &RankedPeer<'_>) -> Ordering {
    b.nft
        .listed
        .cmp(&a.nft.listed)
        .then_with(|| b.in_marketplace.cmp(&a.in_marketplace))
        .then_with(|| a.price.total_cmp(&b.price))
        .then_with(|| a.price_tiime.total_cmp(&b.price_tiime))
}

fn filter_hits(filter: Option<&str>, value: Option<&str>) -> bool {
    filter.is_some() && filter == value
}

/// Aggregate the serie of `nft` out of `snapshot`
///
/// `snapshot` may contain records of other series; they are ignored.
pub fn aggregate(nft: &Nft, snapshot: &[Nft], ctx: &QueryContext) -> EnrichmentResult<SerieStats> {
    let marketplace = ctx.marketplace_id.as_deref();
    let owner = ctx.owner.as_deref();

    if nft.is_unique() {
        let in_marketplace = marketplace.is_none() || filter_hits(marketplace, nft.marketplace_id.as_deref());
        let owned = filter_hits(owner, Some(nft.owner.as_str()));
        return Ok(SerieStats {
            serie_data: vec![SerieSummary::from(nft)],
            total_nft: 1,
            total_listed_nft: usize::from(nft.listed),
            total_listed_in_marketplace: usize::from(nft.listed && in_marketplace),
            total_owned_by_requesting_user: usize::from(owned),
            total_owned_listed_by_requesting_user: usize::from(owned && nft.listed),
            smallest_price: nft.price.clone(),
            smallest_price_tiime: nft.price_tiime.clone(),
        });
    }

    let mut peers = snapshot
        .iter()
        .filter(|peer| peer.serie_id == nft.serie_id)
        .map(|peer| {
            Ok(RankedPeer {
                nft: peer,
                in_marketplace: filter_hits(marketplace, peer.marketplace_id.as_deref()),
                price: parse_price(&peer.price, "price", &peer.id)?,
                price_tiime: parse_price(&peer.price_tiime, "priceTiime", &peer.id)?,
            })
        })
        .collect::<EnrichmentResult<Vec<_>>>()?;

    peers.sort_by(rank);

    let first = peers.first().ok_or_else(|| {
        EnrichmentError::Aggregation(format!("serie {} has no records", nft.serie_id))
    })?;
    let smallest_price = first.nft.price.clone();
    let smallest_price_tiime = first.nft.price_tiime.clone();

    let listed: Vec<&RankedPeer<'_>> = peers.iter().filter(|peer| peer.nft.listed).collect();

    let total_listed_in_marketplace = match marketplace {
        Some(_) => listed.iter().filter(|peer| peer.in_marketplace).count(),
        None => listed.len(),
    };

    let owned_by = |peer: &&RankedPeer<'_>| filter_hits(owner, Some(peer.nft.owner.as_str()));
    let total_owned_by_requesting_user = peers.iter().filter(|peer| owned_by(peer)).count();
    let total_owned_listed_by_requesting_user = listed.iter().filter(|peer| owned_by(peer)).count();

    let serie_data = if ctx.no_series_data {
        Vec::new()
    } else {
        peers.iter().map(|peer| SerieSummary::from(peer.nft)).collect()
    };

    Ok(SerieStats {
        serie_data,
        total_nft: peers.len(),
        total_listed_nft: listed.len(),
        total_listed_in_marketplace,
        total_owned_by_requesting_user,
        total_owned_listed_by_requesting_user,
        smallest_price,
        smallest_price_tiime,
    })
}

/// [`aggregate`] with failures logged and reported as "no serie data"
pub fn aggregate_serie(nft: &Nft, snapshot: &[Nft], ctx: &QueryContext) -> Option<SerieStats> {
    aggregate(nft, snapshot, ctx).map(Some).or_degrade("serie", &nft.id)
}
