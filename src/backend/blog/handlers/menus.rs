//! Menu Handlers
//!
//! Navigation entries ordered by `seat_number`. Public reads, authenticated
//! writes.

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::blog::categories::category_exists;
use crate::backend::blog::handlers::blogs::missing_object;
use crate::backend::blog::handlers::types::{CreateMenuRequest, UpdateMenuRequest};
use crate::backend::blog::menus::{self, Menu};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::shared::validation::validate_text;

const MENU_NOT_FOUND: &str = "Menu not found.";
const TITLE_MAX: usize = 255;

/// Only absolute http(s) URLs with a host
fn validate_link(link: &str) -> BackendResult<()> {
    let parsed = url::Url::parse(link).ok().filter(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
    });

    match parsed {
        Some(_) if !link.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(BackendError::validation("link", "Enter a valid URL.")),
    }
}

/// Validate every field of a menu about to be written
async fn check_menu(pool: &SqlitePool, menu: &Menu) -> BackendResult<()> {
    validate_text("title", &menu.title, Some(TITLE_MAX))?;
    if menu.seat_number < 0 {
        return Err(BackendError::validation(
            "seat_number",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if let Some(link) = &menu.link {
        validate_link(link)?;
    }
    if let Some(category) = menu.category_id {
        if !category_exists(pool, category).await? {
            return Err(BackendError::validation("category", missing_object(category)));
        }
    }
    Ok(())
}

/// List menus by seat number
pub async fn list_menus(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<Menu>>> {
    Ok(Json(menus::list_menus(&pool).await?))
}

pub async fn get_menu(State(pool): State<SqlitePool>, ApiPath(id): ApiPath<i64>) -> BackendResult<Json<Menu>> {
    menus::get_menu(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found(MENU_NOT_FOUND))
}

pub async fn create_menu(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateMenuRequest>,
) -> BackendResult<(StatusCode, Json<Menu>)> {
    let menu = Menu {
        id: 0,
        title: request.title,
        seat_number: request.seat_number,
        category_id: request.category,
        link: request.link,
    };
    check_menu(&pool, &menu).await?;

    let menu = menus::insert_menu(&pool, &menu).await?;
    tracing::info!("Menu {} created by {}", menu.id, user.0.username);
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn update_menu(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateMenuRequest>,
) -> BackendResult<Json<Menu>> {
    let mut menu = menus::get_menu(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found(MENU_NOT_FOUND))?;

    if let Some(title) = request.title {
        menu.title = title;
    }
    if let Some(seat_number) = request.seat_number {
        menu.seat_number = seat_number;
    }
    if let Some(category) = request.category {
        menu.category_id = category;
    }
    if let Some(link) = request.link {
        menu.link = link;
    }
    check_menu(&pool, &menu).await?;

    let menu = menus::update_menu(&pool, &menu).await?;
    tracing::info!("Menu {} updated by {}", id, user.0.username);
    Ok(Json(menu))
}

pub async fn delete_menu(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<MessageResponse>> {
    if !menus::delete_menu(&pool, id).await? {
        return Err(BackendError::not_found(MENU_NOT_FOUND));
    }

    tracing::info!("Menu {} deleted by {}", id, user.0.username);
    Ok(Json(MessageResponse::new("Menu deleted.")))
}
