/**
 * Comment Model and Database Operations
 *
 * Comments belong to a blog and optionally reply to another comment of the
 * same blog (`parent_comment_id`). Deleting a comment cascades to its
 * replies through the foreign key.
 */

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

/// Comment row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "blog")]
    pub blog_id: i64,
    #[serde(rename = "author")]
    pub author_id: i64,
    pub content: String,
    #[serde(rename = "parent_comment")]
    pub parent_comment_id: Option<i64>,
    pub like: i64,
    pub dislike: i64,
}

pub async fn count_comments<'e, E: SqliteExecutor<'e>>(executor: E, blog_id: Option<i64>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE ($1 IS NULL OR blog_id = $1)")
        .bind(blog_id)
        .fetch_one(executor)
        .await
}

/// One page of comments, newest first
pub async fn list_comments<'e, E: SqliteExecutor<'e>>(
    executor: E,
    blog_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, blog_id, author_id, content, parent_comment_id, "like", dislike
        FROM comments
        WHERE ($1 IS NULL OR blog_id = $1)
        ORDER BY id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(blog_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// Every comment on the given blogs, used to assemble reply threads
pub async fn comments_for_blogs<'e, E: SqliteExecutor<'e>>(
    executor: E,
    blog_ids: &[i64],
) -> Result<Vec<Comment>, sqlx::Error> {
    if blog_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"SELECT id, blog_id, author_id, content, parent_comment_id, "like", dislike FROM comments WHERE blog_id IN ("#,
    );
    let mut ids = builder.separated(", ");
    for id in blog_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");

    builder.build_query_as::<Comment>().fetch_all(executor).await
}

pub async fn get_comment<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, blog_id, author_id, content, parent_comment_id, "like", dislike
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_comment<'e, E: SqliteExecutor<'e>>(
    executor: E,
    blog_id: i64,
    author_id: i64,
    content: &str,
    parent_comment_id: Option<i64>,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (blog_id, author_id, content, parent_comment_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, blog_id, author_id, content, parent_comment_id, "like", dislike
        "#,
    )
    .bind(blog_id)
    .bind(author_id)
    .bind(content)
    .bind(parent_comment_id)
    .fetch_one(executor)
    .await
}

/// Write the editable fields (`content`, `like`, `dislike`)
pub async fn update_comment<'e, E: SqliteExecutor<'e>>(executor: E, comment: &Comment) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $1, "like" = $2, dislike = $3
        WHERE id = $4
        RETURNING id, blog_id, author_id, content, parent_comment_id, "like", dislike
        "#,
    )
    .bind(&comment.content)
    .bind(comment.like)
    .bind(comment.dislike)
    .bind(comment.id)
    .fetch_one(executor)
    .await
}

pub async fn delete_comment<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}
