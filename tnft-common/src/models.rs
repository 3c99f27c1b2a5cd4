//! Domain models shared by the TNFT services
//!
//! Records are received as the ledger indexer reports them and are never
//! mutated by enrichment; enrichment always builds a new composite view.

use serde::{de, Deserialize, Deserializer, Serialize};

/// Serie identifier carried by one-of-a-kind items
pub const UNIQUE_SERIE_ID: &str = "0";

fn default_serie_id() -> String {
    UNIQUE_SERIE_ID.to_string()
}

/// Media location inside an NFT descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
}

/// NFT record as recorded on the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub id: String,
    /// Edition group; "0" means unique
    #[serde(default = "default_serie_id")]
    pub serie_id: String,
    pub owner: String,
    pub creator: String,
    /// Indexers report this either as a boolean or as a 0/1 count
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub listed: bool,
    /// Decimal string
    #[serde(default)]
    pub price: String,
    /// Decimal string, secondary denomination
    #[serde(default)]
    pub price_tiime: String,
    #[serde(default)]
    pub marketplace_id: Option<String>,
    /// Content-addressed descriptor URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypted_media: Option<MediaRef>,
}

impl Nft {
    /// Create an unlisted record with empty prices
    pub fn new(
        id: impl Into<String>,
        serie_id: impl Into<String>,
        owner: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            serie_id: serie_id.into(),
            owner: owner.into(),
            creator: creator.into(),
            listed: false,
            price: String::new(),
            price_tiime: String::new(),
            marketplace_id: None,
            uri: None,
            media: None,
            crypted_media: None,
        }
    }

    /// True for one-of-a-kind items that have no serie peers
    pub fn is_unique(&self) -> bool {
        self.serie_id == UNIQUE_SERIE_ID
    }
}

/// Interpret a flag given as `true`/`false` or as a count (`0` is false)
pub fn parse_flag(raw: &str) -> crate::Result<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => other.parse::<i64>().map(|count| count != 0).map_err(|_| {
            crate::Error::InvalidInput(format!("expected true, false or a count, got {:?}", raw))
        }),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Flag(bool),
    Count(i64),
    Text(String),
}

impl FlagRepr {
    fn into_flag<E: de::Error>(self) -> Result<bool, E> {
        match self {
            FlagRepr::Flag(flag) => Ok(flag),
            FlagRepr::Count(count) => Ok(count != 0),
            FlagRepr::Text(raw) => parse_flag(&raw).map_err(E::custom),
        }
    }
}

/// Boolean that also accepts the ledger's integer counts and their string forms
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    FlagRepr::deserialize(deserializer)?.into_flag()
}

/// Optional variant of [`deserialize_flag`]
pub fn deserialize_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FlagRepr>::deserialize(deserializer)?
        .map(FlagRepr::into_flag)
        .transpose()
}

/// User directory entry keyed by ledger wallet id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub wallet_id: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub twitter_name: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Classification tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request-scoped filters that bias serie ranking and statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContext {
    #[serde(default)]
    pub marketplace_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    /// Suppress the per-peer list while keeping counts
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub no_series_data: bool,
}
