//! NFT record queries

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::{BTreeSet, HashMap};
use tnft_common::{Nft, Result};

const NFT_COLUMNS: &str =
    "SELECT id, serie_id, owner, creator, listed, price, price_tiime, marketplace_id, uri FROM nfts";

/// Listing filter; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct NftFilter {
    pub owner: Option<String>,
    pub creator: Option<String>,
    pub listed: Option<bool>,
    pub marketplace_id: Option<String>,
}

fn nft_from_row(row: &SqliteRow) -> Result<Nft> {
    Ok(Nft {
        id: row.try_get("id")?,
        serie_id: row.try_get("serie_id")?,
        owner: row.try_get("owner")?,
        creator: row.try_get("creator")?,
        listed: row.try_get::<i64, _>("listed")? != 0,
        price: row.try_get("price")?,
        price_tiime: row.try_get("price_tiime")?,
        marketplace_id: row.try_get("marketplace_id")?,
        uri: row.try_get("uri")?,
        media: None,
        crypted_media: None,
    })
}

/// NFTs matching `filter`, in ledger (insertion) order
pub async fn list_nfts(pool: &SqlitePool, filter: &NftFilter) -> Result<Vec<Nft>> {
    let mut query = QueryBuilder::<Sqlite>::new(NFT_COLUMNS);
    query.push(" WHERE 1 = 1");

    if let Some(owner) = &filter.owner {
        query.push(" AND owner = ").push_bind(owner.clone());
    }
    if let Some(creator) = &filter.creator {
        query.push(" AND creator = ").push_bind(creator.clone());
    }
    if let Some(listed) = filter.listed {
        query.push(" AND listed = ").push_bind(i64::from(listed));
    }
    if let Some(marketplace_id) = &filter.marketplace_id {
        query
            .push(" AND marketplace_id = ")
            .push_bind(marketplace_id.clone());
    }
    query.push(" ORDER BY rowid");

    let rows = query.build().fetch_all(pool).await?;
    rows.iter().map(nft_from_row).collect()
}

/// Load one NFT by id
pub async fn get_nft(pool: &SqlitePool, id: &str) -> Result<Option<Nft>> {
    let sql = format!("{} WHERE id = ?", NFT_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(nft_from_row).transpose()
}

/// Every record of the given series, grouped by serie id
///
/// Unique items ("0") have no peers and are skipped.
pub async fn load_series_snapshot(
    pool: &SqlitePool,
    serie_ids: &[String],
) -> Result<HashMap<String, Vec<Nft>>> {
    let wanted: BTreeSet<&str> = serie_ids
        .iter()
        .map(String::as_str)
        .filter(|serie_id| *serie_id != tnft_common::UNIQUE_SERIE_ID)
        .collect();

    let mut snapshots: HashMap<String, Vec<Nft>> = HashMap::new();
    if wanted.is_empty() {
        return Ok(snapshots);
    }

    let mut query = QueryBuilder::<Sqlite>::new(NFT_COLUMNS);
    query.push(" WHERE serie_id IN (");
    let mut separated = query.separated(", ");
    for serie_id in &wanted {
        separated.push_bind(serie_id.to_string());
    }
    separated.push_unseparated(") ORDER BY rowid");

    for row in query.build().fetch_all(pool).await? {
        let nft = nft_from_row(&row)?;
        snapshots.entry(nft.serie_id.clone()).or_default().push(nft);
    }

    Ok(snapshots)
}

/// Insert or replace an NFT record
pub async fn upsert_nft(pool: &SqlitePool, nft: &Nft) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nfts (
            id, serie_id, owner, creator, listed, price, price_tiime, marketplace_id, uri
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            serie_id = excluded.serie_id,
            owner = excluded.owner,
            creator = excluded.creator,
            listed = excluded.listed,
            price = excluded.price,
            price_tiime = excluded.price_tiime,
            marketplace_id = excluded.marketplace_id,
            uri = excluded.uri
        "#,
    )
    .bind(&nft.id)
    .bind(&nft.serie_id)
    .bind(&nft.owner)
    .bind(&nft.creator)
    .bind(i64::from(nft.listed))
    .bind(&nft.price)
    .bind(&nft.price_tiime)
    .bind(&nft.marketplace_id)
    .bind(&nft.uri)
    .execute(pool)
    .await?;

    Ok(())
}
