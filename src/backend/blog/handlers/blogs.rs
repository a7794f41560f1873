/**
 * Blog Handlers
 *
 * - `GET /blog/blogs` paginated, filtered list
 * - `POST /blog/blogs` create (authenticated, caller becomes the author)
 * - `GET /blog/blogs/{id}` retrieve
 * - `PUT|PATCH /blog/blogs/{id}` partial update (author only)
 * - `DELETE /blog/blogs/{id}` delete (author only)
 *
 * Writes that touch the tag set run in one transaction with the blog row.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{Days, NaiveDate, NaiveTime};
use sqlx::SqliteExecutor;
use std::collections::BTreeSet;

use crate::backend::blog::blogs::{self, Blog, BlogDraft, BlogFilter};
use crate::backend::blog::categories::category_exists;
use crate::backend::blog::handlers::types::{BlogListQuery, BlogResponse, CreateBlogRequest, UpdateBlogRequest};
use crate::backend::blog::pagination::{Page, PageWindow};
use crate::backend::blog::tags::existing_tag_ids;
use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::validation::validate_text;

const BLOG_NOT_FOUND: &str = "Blog not found.";
const NOT_AUTHOR: &str = "You can't modify this blog.";
const TITLE_MAX: usize = 255;

pub fn missing_object(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// Translate the query string into a `BlogFilter`
fn blog_filter(query: &BlogListQuery) -> BackendResult<BlogFilter> {
    let search_terms = query
        .search
        .as_deref()
        .map(|search| search.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let created_between = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => Some(day_range(start, end)?),
        _ => None,
    };

    Ok(BlogFilter {
        author_id: query.author,
        category_id: query.category,
        tag_id: query.tags,
        active: query.active,
        search_terms,
        created_between,
    })
}

/// `[start 00:00, end + 1 day 00:00)` in UTC
fn day_range(
    start: NaiveDate,
    end: NaiveDate,
) -> BackendResult<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
    let end_exclusive = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| BackendError::validation("end_date", "Enter a valid date."))?;
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end_exclusive.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Ensure a referenced category exists
async fn check_category<'e, E: SqliteExecutor<'e>>(executor: E, category: Option<i64>) -> BackendResult<()> {
    if let Some(id) = category {
        if !category_exists(executor, id).await? {
            return Err(BackendError::validation("category", missing_object(id)));
        }
    }
    Ok(())
}

/// Deduplicate tag ids and ensure every one exists
async fn check_tags<'e, E: SqliteExecutor<'e>>(executor: E, tags: &[i64]) -> BackendResult<Vec<i64>> {
    let wanted: Vec<i64> = tags.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let found: BTreeSet<i64> = existing_tag_ids(executor, &wanted).await?.into_iter().collect();

    if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
        return Err(BackendError::validation("tags", missing_object(*missing)));
    }
    Ok(wanted)
}

async fn blog_response<'e, E: SqliteExecutor<'e>>(executor: E, blog: Blog) -> BackendResult<BlogResponse> {
    let mut tags = blogs::tags_for_blogs(executor, &[blog.id]).await?;
    let blog_tags = tags.remove(&blog.id).unwrap_or_default();
    Ok(BlogResponse::new(blog, blog_tags))
}

/// Load a blog and check the caller wrote it
async fn authored_blog(state: &AppState, user: &AuthUser, id: i64) -> BackendResult<Blog> {
    let blog = blogs::get_blog(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found(BLOG_NOT_FOUND))?;

    if blog.author_id != user.0.account_id {
        tracing::warn!("User {} tried to modify blog {}", user.0.username, id);
        return Err(BackendError::forbidden(NOT_AUTHOR));
    }
    Ok(blog)
}

/// List blogs
pub async fn list_blogs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BlogListQuery>,
) -> BackendResult<Json<Page<BlogResponse>>> {
    let window = PageWindow::resolve(
        query.page,
        query.page_size,
        state.config.page_size,
        state.config.max_page_size,
    )?;
    let filter = blog_filter(&query)?;

    let count = blogs::count_blogs(&state.db, &filter).await?;
    window.check(count)?;

    let page_blogs = blogs::list_blogs(&state.db, &filter, window.limit(), window.offset()).await?;
    let ids: Vec<i64> = page_blogs.iter().map(|blog| blog.id).collect();
    let mut tags = blogs::tags_for_blogs(&state.db, &ids).await?;

    let results = page_blogs
        .into_iter()
        .map(|blog| {
            let blog_tags = tags.remove(&blog.id).unwrap_or_default();
            BlogResponse::new(blog, blog_tags)
        })
        .collect();

    Ok(Json(window.into_page(count, results)))
}

/// Retrieve one blog
pub async fn get_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<BlogResponse>> {
    let blog = blogs::get_blog(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found(BLOG_NOT_FOUND))?;
    Ok(Json(blog_response(&state.db, blog).await?))
}

/// Create a blog authored by the caller
pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateBlogRequest>,
) -> BackendResult<(StatusCode, Json<BlogResponse>)> {
    validate_text("title", &request.title, Some(TITLE_MAX))?;

    let mut tx = state.db.begin().await?;
    check_category(&mut *tx, request.category).await?;
    let tags = check_tags(&mut *tx, &request.tags).await?;

    let draft = BlogDraft {
        title: request.title,
        main_image: request.main_image,
        description: request.description,
        category_id: request.category,
        active: request.active,
    };
    let blog = blogs::insert_blog(&mut *tx, &draft, user.0.account_id).await?;
    blogs::set_blog_tags(&mut tx, blog.id, &tags).await?;
    tx.commit().await?;

    tracing::info!("Blog {} created by {}", blog.id, user.0.username);
    Ok((StatusCode::CREATED, Json(BlogResponse::new(blog, tags))))
}

/// Partially update a blog
pub async fn update_blog(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateBlogRequest>,
) -> BackendResult<Json<BlogResponse>> {
    let mut blog = authored_blog(&state, &user, id).await?;

    if let Some(title) = request.title {
        validate_text("title", &title, Some(TITLE_MAX))?;
        blog.title = title;
    }
    if let Some(main_image) = request.main_image {
        blog.main_image = main_image;
    }
    if let Some(description) = request.description {
        blog.description = description;
    }
    if let Some(active) = request.active {
        blog.active = active;
    }

    let mut tx = state.db.begin().await?;
    if let Some(category) = request.category {
        check_category(&mut *tx, category).await?;
        blog.category_id = category;
    }
    let tags = match request.tags {
        Some(tags) => Some(check_tags(&mut *tx, &tags).await?),
        None => None,
    };

    let blog = blogs::update_blog(&mut *tx, &blog).await?;
    if let Some(tags) = &tags {
        blogs::set_blog_tags(&mut tx, blog.id, tags).await?;
    }
    let response = blog_response(&mut *tx, blog).await?;
    tx.commit().await?;

    tracing::info!("Blog {} updated by {}", id, user.0.username);
    Ok(Json(response))
}

/// Delete a blog with its comments
pub async fn delete_blog(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<MessageResponse>> {
    authored_blog(&state, &user, id).await?;
    blogs::delete_blog(&state.db, id).await?;

    tracing::info!("Blog {} deleted by {}", id, user.0.username);
    Ok(Json(MessageResponse::new("Blog deleted.")))
}
