//! Database access for tnft-api
//!
//! Local SQLite mirror of the ledger indexer: NFT records, the user directory
//! and the category directory.

pub mod categories;
pub mod nfts;
pub mod users;

pub use categories::SqliteCategoryDirectory;
pub use users::SqliteUserDirectory;

use sqlx::SqlitePool;
use std::path::Path;
use tnft_common::Result;

/// Initialize database connection pool
///
/// Creates the database file and the tables on first use.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nfts (
            id TEXT PRIMARY KEY,
            serie_id TEXT NOT NULL DEFAULT '0',
            owner TEXT NOT NULL,
            creator TEXT NOT NULL,
            listed INTEGER NOT NULL DEFAULT 0,
            price TEXT NOT NULL DEFAULT '',
            price_tiime TEXT NOT NULL DEFAULT '',
            marketplace_id TEXT,
            uri TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_nfts_serie_id ON nfts (serie_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            wallet_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            picture TEXT,
            twitter_name TEXT,
            custom_url TEXT,
            verified INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nft_categories (
            nft_id TEXT NOT NULL,
            category_code TEXT NOT NULL REFERENCES categories(code),
            PRIMARY KEY (nft_id, category_code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (nfts, users, categories, nft_categories)");

    Ok(())
}
