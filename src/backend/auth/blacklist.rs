//! Refresh token blacklist
//!
//! A revoked refresh token's `jti` is kept until the token would have
//! expired anyway; `purge_expired` then drops it.

use chrono::Utc;
use sqlx::SqliteExecutor;

use crate::backend::auth::sessions::Claims;

/// Revoke a refresh token
///
/// Returns `false` if the token was already blacklisted.
pub async fn blacklist_token<'e, E: SqliteExecutor<'e>>(
    executor: E,
    claims: &Claims,
    account_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO token_blacklist (jti, account_id, expires_at, blacklisted_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&claims.jti)
    .bind(account_id)
    .bind(claims.exp as i64)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn is_blacklisted<'e, E: SqliteExecutor<'e>>(executor: E, jti: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM token_blacklist WHERE jti = $1")
        .bind(jti)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

/// Drop entries whose token expired before `now` (Unix seconds)
pub async fn purge_expired<'e, E: SqliteExecutor<'e>>(executor: E, now: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < $1")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
