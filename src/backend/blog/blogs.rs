/**
 * Blog Model and Database Operations
 *
 * Blog rows plus their tag links (`blog_tags`). Listing supports the
 * filters exposed by `GET /blog/blogs`; they are assembled with sqlx's
 * `QueryBuilder` so every value is bound, never interpolated.
 */

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor};
use std::collections::HashMap;

/// Blog row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub main_image: String,
    pub description: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

/// Fields supplied when creating a blog
#[derive(Debug, Clone)]
pub struct BlogDraft {
    pub title: String,
    pub main_image: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub active: bool,
}

#[cfg(test)]
impl BlogDraft {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            main_image: "blog_images/cover.png".to_string(),
            description: format!("About {title}"),
            category_id: None,
            active: true,
        }
    }
}

/// List filters; empty means "all blogs"
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub active: Option<bool>,
    /// Every term must appear in the title or the description
    pub search_terms: Vec<String>,
    /// Half-open `created_at` range
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl BlogFilter {
    fn push_conditions<'a>(&'a self, builder: &mut QueryBuilder<'a, Sqlite>) {
        builder.push(" WHERE 1 = 1");

        if let Some(author_id) = self.author_id {
            builder.push(" AND b.author_id = ").push_bind(author_id);
        }
        if let Some(category_id) = self.category_id {
            builder.push(" AND b.category_id = ").push_bind(category_id);
        }
        if let Some(tag_id) = self.tag_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM blog_tags bt WHERE bt.blog_id = b.id AND bt.tag_id = ")
                .push_bind(tag_id)
                .push(")");
        }
        if let Some(active) = self.active {
            builder.push(" AND b.active = ").push_bind(active);
        }
        for term in &self.search_terms {
            let pattern = format!("%{}%", escape_like(term));
            builder
                .push(" AND (b.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR b.description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some((start, end)) = self.created_between {
            builder
                .push(" AND b.created_at >= ")
                .push_bind(start)
                .push(" AND b.created_at < ")
                .push_bind(end);
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn count_blogs<'e, E: SqliteExecutor<'e>>(executor: E, filter: &BlogFilter) -> Result<i64, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM blogs b");
    filter.push_conditions(&mut builder);
    builder.build_query_scalar::<i64>().fetch_one(executor).await
}

/// One page of blogs ordered by id
pub async fn list_blogs<'e, E: SqliteExecutor<'e>>(
    executor: E,
    filter: &BlogFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Blog>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT b.id, b.title, b.main_image, b.description, b.author_id, b.category_id, b.created_at, b.updated_at, b.active FROM blogs b",
    );
    filter.push_conditions(&mut builder);
    builder
        .push(" ORDER BY b.id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    builder.build_query_as::<Blog>().fetch_all(executor).await
}

pub async fn get_blog<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        SELECT id, title, main_image, description, author_id, category_id, created_at, updated_at, active
        FROM blogs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn blog_exists<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM blogs WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn insert_blog<'e, E: SqliteExecutor<'e>>(
    executor: E,
    draft: &BlogDraft,
    author_id: i64,
) -> Result<Blog, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, main_image, description, author_id, category_id, created_at, updated_at, active)
        VALUES ($1, $2, $3, $4, $5, $6, $6, $7)
        RETURNING id, title, main_image, description, author_id, category_id, created_at, updated_at, active
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.main_image)
    .bind(&draft.description)
    .bind(author_id)
    .bind(draft.category_id)
    .bind(now)
    .bind(draft.active)
    .fetch_one(executor)
    .await
}

/// Write the editable fields and bump `updated_at`
pub async fn update_blog<'e, E: SqliteExecutor<'e>>(executor: E, blog: &Blog) -> Result<Blog, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs
        SET title = $1, main_image = $2, description = $3, category_id = $4, active = $5, updated_at = $6
        WHERE id = $7
        RETURNING id, title, main_image, description, author_id, category_id, created_at, updated_at, active
        "#,
    )
    .bind(&blog.title)
    .bind(&blog.main_image)
    .bind(&blog.description)
    .bind(blog.category_id)
    .bind(blog.active)
    .bind(Utc::now())
    .bind(blog.id)
    .fetch_one(executor)
    .await
}

/// Delete a blog; comments and tag links cascade
pub async fn delete_blog<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Replace the tag set of a blog
pub async fn set_blog_tags(conn: &mut SqliteConnection, blog_id: i64, tag_ids: &[i64]) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM blog_tags WHERE blog_id = $1")
        .bind(blog_id)
        .execute(&mut *conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) ");
    builder.push_values(tag_ids, |mut row, tag_id| {
        row.push_bind(blog_id).push_bind(*tag_id);
    });
    builder.build().execute(&mut *conn).await?;
    Ok(())
}

/// Tag ids per blog, sorted
pub async fn tags_for_blogs<'e, E: SqliteExecutor<'e>>(
    executor: E,
    blog_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, sqlx::Error> {
    let mut tags: HashMap<i64, Vec<i64>> = HashMap::new();
    if blog_ids.is_empty() {
        return Ok(tags);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT blog_id, tag_id FROM blog_tags WHERE blog_id IN (");
    let mut separated = builder.separated(", ");
    for id in blog_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY blog_id, tag_id");

    let rows: Vec<(i64, i64)> = builder.build_query_as().fetch_all(executor).await?;
    for (blog_id, tag_id) in rows {
        tags.entry(blog_id).or_default().push(tag_id);
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::create_account;
    use crate::backend::blog::tags::insert_tag;
    use crate::backend::test_support::test_pool;
    use chrono::Duration;

    async fn author(pool: &sqlx::SqlitePool, name: &str) -> i64 {
        create_account(pool, name, &format!("{name}@x.com"), "hash").await.unwrap().id
    }

    fn titles(blogs: &[Blog]) -> Vec<&str> {
        blogs.iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_defaults() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;

        let blog = insert_blog(&pool, &BlogDraft::titled("Hello"), alice).await.unwrap();
        assert!(blog.active);
        assert_eq!(blog.created_at, blog.updated_at);
        assert!(blog_exists(&pool, blog.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_requires_every_term() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;
        insert_blog(&pool, &BlogDraft::titled("Rust async"), alice).await.unwrap();
        insert_blog(&pool, &BlogDraft::titled("Rust traits"), alice).await.unwrap();
        insert_blog(&pool, &BlogDraft::titled("Go channels"), alice).await.unwrap();

        let filter = BlogFilter {
            search_terms: vec!["rust".to_string(), "ASYNC".to_string()],
            ..Default::default()
        };
        let found = list_blogs(&pool, &filter, 10, 0).await.unwrap();
        assert_eq!(titles(&found), vec!["Rust async"]);
        assert_eq!(count_blogs(&pool, &filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_like_wildcards_are_literal() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;
        insert_blog(&pool, &BlogDraft::titled("100% rust"), alice).await.unwrap();
        insert_blog(&pool, &BlogDraft::titled("100 rust"), alice).await.unwrap();

        let filter = BlogFilter {
            search_terms: vec!["100%".to_string()],
            ..Default::default()
        };
        assert_eq!(titles(&list_blogs(&pool, &filter, 10, 0).await.unwrap()), vec!["100% rust"]);
    }

    #[tokio::test]
    async fn test_author_tag_and_active_filters() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;
        let bob = author(&pool, "bob").await;
        let tag = insert_tag(&pool, "rust").await.unwrap();

        let tagged = insert_blog(&pool, &BlogDraft::titled("A"), alice).await.unwrap();
        let mut hidden = BlogDraft::titled("B");
        hidden.active = false;
        insert_blog(&pool, &hidden, alice).await.unwrap();
        insert_blog(&pool, &BlogDraft::titled("C"), bob).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        set_blog_tags(&mut conn, tagged.id, &[tag.id, tag.id]).await.unwrap();
        drop(conn);

        let by_author = BlogFilter {
            author_id: Some(alice),
            ..Default::default()
        };
        assert_eq!(count_blogs(&pool, &by_author).await.unwrap(), 2);

        let by_tag = BlogFilter {
            tag_id: Some(tag.id),
            ..Default::default()
        };
        assert_eq!(titles(&list_blogs(&pool, &by_tag, 10, 0).await.unwrap()), vec!["A"]);

        let inactive = BlogFilter {
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(titles(&list_blogs(&pool, &inactive, 10, 0).await.unwrap()), vec!["B"]);

        let tags = tags_for_blogs(&pool, &[tagged.id]).await.unwrap();
        assert_eq!(tags.get(&tagged.id), Some(&vec![tag.id]));
    }

    #[tokio::test]
    async fn test_created_range() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;
        insert_blog(&pool, &BlogDraft::titled("Now"), alice).await.unwrap();

        let now = Utc::now();
        let around = BlogFilter {
            created_between: Some((now - Duration::hours(1), now + Duration::hours(1))),
            ..Default::default()
        };
        assert_eq!(count_blogs(&pool, &around).await.unwrap(), 1);

        let before = BlogFilter {
            created_between: Some((now - Duration::days(2), now - Duration::days(1))),
            ..Default::default()
        };
        assert_eq!(count_blogs(&pool, &before).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_paging_and_update() {
        let pool = test_pool().await;
        let alice = author(&pool, "alice").await;
        for title in ["1", "2", "3"] {
            insert_blog(&pool, &BlogDraft::titled(title), alice).await.unwrap();
        }

        let page = list_blogs(&pool, &BlogFilter::default(), 2, 2).await.unwrap();
        assert_eq!(titles(&page), vec!["3"]);

        let mut blog = page[0].clone();
        blog.title = "three".to_string();
        let updated = update_blog(&pool, &blog).await.unwrap();
        assert_eq!(updated.title, "three");
        assert!(updated.updated_at >= updated.created_at);

        assert!(delete_blog(&pool, blog.id).await.unwrap());
        assert!(get_blog(&pool, blog.id).await.unwrap().is_none());
    }
}
