/**
 * Account Model and Database Operations
 *
 * This module handles account rows: creation on registration, lookups used
 * by login and token verification, activation, password changes and
 * profile edits.
 *
 * All queries take a generic `SqliteExecutor` so they can run on the pool
 * or inside a transaction.
 */

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

/// Account row
///
/// Deliberately not `Serialize`: it carries the password hash. Handlers
/// convert it into `UserResponse` before it leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Primary key
    pub id: i64,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Raw profile image bytes
    pub profile_image: Option<Vec<u8>>,
    /// False until the activation link is redeemed
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    /// Time of the last successful login
    pub last_login: Option<DateTime<Utc>>,
}

/// Profile fields after a partial update has been applied
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<Vec<u8>>,
}

/// Create a new, inactive account
pub async fn create_account<'e, E: SqliteExecutor<'e>>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Account, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (username, email, password_hash, is_active, date_joined)
        VALUES ($1, $2, $3, 0, $4)
        RETURNING id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// Get account by ID
pub async fn get_account_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Get account by username
pub async fn get_account_by_username<'e, E: SqliteExecutor<'e>>(
    executor: E,
    username: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        FROM accounts
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await
}

/// Get account by email
pub async fn get_account_by_email<'e, E: SqliteExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        FROM accounts
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

/// List all accounts ordered by ID
pub async fn list_accounts<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        FROM accounts
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Flip an inactive account to active
///
/// Returns `false` if the account was already active (or does not exist),
/// so two concurrent redemptions of the same link cannot both succeed.
pub async fn activate_account<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE accounts SET is_active = 1 WHERE id = $1 AND is_active = 0")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Replace the password hash
pub async fn set_password_hash<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Record a successful login
pub async fn record_login<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET last_login = $1 WHERE id = $2")
        .bind(at)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Write the editable profile fields
pub async fn update_profile<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    fields: &ProfileFields,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET username = $1, email = $2, first_name = $3, last_name = $4, profile_image = $5
        WHERE id = $6
        RETURNING id, username, email, password_hash, first_name, last_name, profile_image, is_active, date_joined, last_login
        "#,
    )
    .bind(&fields.username)
    .bind(&fields.email)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.profile_image)
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Delete an account; blogs, comments and blacklist entries cascade
pub async fn delete_account<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Field that a unique constraint failure on `accounts` refers to
pub fn conflicting_field(err: &sqlx::Error) -> Option<&'static str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            if db_err.message().contains("accounts.email") {
                Some("email")
            } else {
                Some("username")
            }
        }
        _ => None,
    }
}
