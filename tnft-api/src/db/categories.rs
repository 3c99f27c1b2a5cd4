//! Category directory queries

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tnft_common::{Category, Result};

use crate::enrichment::CategoryDirectory;

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

/// All categories, ordered by code
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT code, name, description FROM categories ORDER BY code")
        .fetch_all(pool)
        .await?;

    rows.iter().map(category_from_row).collect()
}

/// Categories linked to an NFT; `None` when it has no links
pub async fn find_categories_for_nft(pool: &SqlitePool, nft_id: &str) -> Result<Option<Vec<Category>>> {
    let rows = sqlx::query(
        r#"
        SELECT c.code, c.name, c.description
        FROM nft_categories nc
        JOIN categories c ON c.code = nc.category_code
        WHERE nc.nft_id = ?
        ORDER BY c.code
        "#,
    )
    .bind(nft_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(None);
    }
    rows.iter().map(category_from_row).collect::<Result<Vec<_>>>().map(Some)
}

/// Insert or replace a category
pub async fn upsert_category(pool: &SqlitePool, category: &Category) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO categories (code, name, description) VALUES (?, ?, ?)
        ON CONFLICT(code) DO UPDATE SET
            name = excluded.name,
            description = excluded.description
        "#,
    )
    .bind(&category.code)
    .bind(&category.name)
    .bind(&category.description)
    .execute(pool)
    .await?;

    Ok(())
}

/// Tag an NFT with a category
pub async fn link_category(pool: &SqlitePool, nft_id: &str, category_code: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO nft_categories (nft_id, category_code) VALUES (?, ?)")
        .bind(nft_id)
        .bind(category_code)
        .execute(pool)
        .await?;

    Ok(())
}

/// [`CategoryDirectory`] backed by the `nft_categories` link table
#[derive(Debug, Clone)]
pub struct SqliteCategoryDirectory {
    pool: SqlitePool,
}

impl SqliteCategoryDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryDirectory for SqliteCategoryDirectory {
    async fn find_categories_for_nft(&self, nft_id: &str) -> Result<Option<Vec<Category>>> {
        find_categories_for_nft(&self.pool, nft_id).await
    }
}
