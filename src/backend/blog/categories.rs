//! Category Model and Database Operations
//!
//! Rows store only `parent_id`; tree questions are answered by
//! `category_tree::CategoryTree` over `all_categories`.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor};

/// Category row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub parent_id: Option<i64>,
}

pub async fn all_categories<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, title, parent_id FROM categories")
        .fetch_all(executor)
        .await
}

pub async fn category_exists<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn insert_category<'e, E: SqliteExecutor<'e>>(
    executor: E,
    title: &str,
    parent_id: Option<i64>,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "INSERT INTO categories (title, parent_id) VALUES ($1, $2) RETURNING id, title, parent_id",
    )
    .bind(title)
    .bind(parent_id)
    .fetch_one(executor)
    .await
}

pub async fn update_category<'e, E: SqliteExecutor<'e>>(
    executor: E,
    category: &Category,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE categories SET title = $1, parent_id = $2 WHERE id = $3 RETURNING id, title, parent_id",
    )
    .bind(&category.title)
    .bind(category.parent_id)
    .bind(category.id)
    .fetch_one(executor)
    .await
}

/// Delete a set of categories, detaching blogs and menus first
///
/// Run inside a transaction; `ids` should be a whole subtree.
pub async fn delete_categories(conn: &mut SqliteConnection, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    for statement in [
        "UPDATE blogs SET category_id = NULL WHERE category_id IN (",
        "UPDATE menus SET category_id = NULL WHERE category_id IN (",
    ] {
        in_list(statement, ids).build().execute(&mut *conn).await?;
    }

    let result = in_list("DELETE FROM categories WHERE id IN (", ids)
        .build()
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

fn in_list<'a>(prefix: &str, ids: &'a [i64]) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(prefix);
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    builder
}
