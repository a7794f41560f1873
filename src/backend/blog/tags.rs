//! Tag Model and Database Operations

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

/// Tag row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

pub async fn list_tags<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
        .fetch_all(executor)
        .await
}

pub async fn get_tag<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_tag<'e, E: SqliteExecutor<'e>>(executor: E, name: &str) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(executor)
        .await
}

pub async fn rename_tag<'e, E: SqliteExecutor<'e>>(executor: E, id: i64, name: &str) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("UPDATE tags SET name = $1 WHERE id = $2 RETURNING id, name")
        .bind(name)
        .bind(id)
        .fetch_one(executor)
        .await
}

/// Delete a tag; its blog links cascade
pub async fn delete_tag<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// The subset of `ids` that exist
pub async fn existing_tag_ids<'e, E: SqliteExecutor<'e>>(executor: E, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id FROM tags WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    builder.build_query_scalar::<i64>().fetch_all(executor).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::test_pool;

    #[tokio::test]
    async fn test_tag_crud() {
        let pool = test_pool().await;
        let rust = insert_tag(&pool, "rust").await.unwrap();
        insert_tag(&pool, "go").await.unwrap();

        assert_eq!(list_tags(&pool).await.unwrap().len(), 2);
        assert_eq!(rename_tag(&pool, rust.id, "rustlang").await.unwrap().name, "rustlang");
        assert!(delete_tag(&pool, rust.id).await.unwrap());
        assert!(get_tag(&pool, rust.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_existing_tag_ids() {
        let pool = test_pool().await;
        let a = insert_tag(&pool, "a").await.unwrap();
        let b = insert_tag(&pool, "b").await.unwrap();

        let mut found = existing_tag_ids(&pool, &[a.id, b.id, 999]).await.unwrap();
        found.sort();
        assert_eq!(found, vec![a.id, b.id]);
        assert!(existing_tag_ids(&pool, &[]).await.unwrap().is_empty());
    }
}
