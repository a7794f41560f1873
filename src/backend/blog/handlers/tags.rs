//! Tag Handlers
//!
//! Public reads, authenticated writes. Deleting a tag removes it from every
//! blog through the `blog_tags` cascade.

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::blog::handlers::types::TagRequest;
use crate::backend::blog::tags::{self, Tag};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::shared::validation::validate_text;

const TAG_NOT_FOUND: &str = "Tag not found.";
const NAME_MAX: usize = 50;

fn tag_name(request: TagRequest) -> BackendResult<String> {
    let name = request
        .name
        .ok_or_else(|| BackendError::validation("name", "This field is required."))?;
    validate_text("name", &name, Some(NAME_MAX))?;
    Ok(name)
}

pub async fn list_tags(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<Tag>>> {
    Ok(Json(tags::list_tags(&pool).await?))
}

pub async fn get_tag(State(pool): State<SqlitePool>, ApiPath(id): ApiPath<i64>) -> BackendResult<Json<Tag>> {
    tags::get_tag(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found(TAG_NOT_FOUND))
}

pub async fn create_tag(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiJson(request): ApiJson<TagRequest>,
) -> BackendResult<(StatusCode, Json<Tag>)> {
    let name = tag_name(request)?;
    let tag = tags::insert_tag(&pool, &name).await?;

    tracing::info!("Tag {} created by {}", tag.id, user.0.username);
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Rename a tag; a body without `name` leaves it unchanged
pub async fn update_tag(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<TagRequest>,
) -> BackendResult<Json<Tag>> {
    let tag = tags::get_tag(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found(TAG_NOT_FOUND))?;

    if request.name.is_none() {
        return Ok(Json(tag));
    }
    let name = tag_name(request)?;
    let tag = tags::rename_tag(&pool, id, &name).await?;

    tracing::info!("Tag {} renamed by {}", id, user.0.username);
    Ok(Json(tag))
}

pub async fn delete_tag(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<MessageResponse>> {
    if !tags::delete_tag(&pool, id).await? {
        return Err(BackendError::not_found(TAG_NOT_FOUND));
    }

    tracing::info!("Tag {} deleted by {}", id, user.0.username);
    Ok(Json(MessageResponse::new("Tag deleted.")))
}
