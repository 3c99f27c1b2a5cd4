//! User directory queries

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tnft_common::{Result, User};

use crate::enrichment::UserDirectory;

/// Load a user by ledger wallet id
pub async fn find_user(pool: &SqlitePool, wallet_id: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT wallet_id, name, picture, twitter_name, custom_url, verified
        FROM users
        WHERE wallet_id = ?
        "#,
    )
    .bind(wallet_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(User {
            wallet_id: row.try_get("wallet_id")?,
            name: row.try_get("name")?,
            picture: row.try_get("picture")?,
            twitter_name: row.try_get("twitter_name")?,
            custom_url: row.try_get("custom_url")?,
            verified: row.try_get::<i64, _>("verified")? != 0,
        })),
        None => Ok(None),
    }
}

/// Insert or replace a user
pub async fn upsert_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (wallet_id, name, picture, twitter_name, custom_url, verified)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(wallet_id) DO UPDATE SET
            name = excluded.name,
            picture = excluded.picture,
            twitter_name = excluded.twitter_name,
            custom_url = excluded.custom_url,
            verified = excluded.verified
        "#,
    )
    .bind(&user.wallet_id)
    .bind(&user.name)
    .bind(&user.picture)
    .bind(&user.twitter_name)
    .bind(&user.custom_url)
    .bind(i64::from(user.verified))
    .execute(pool)
    .await?;

    Ok(())
}

/// [`UserDirectory`] backed by the `users` table
#[derive(Debug, Clone)]
pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn find_user(&self, wallet_id: &str) -> Result<Option<User>> {
        find_user(&self.pool, wallet_id).await
    }
}
