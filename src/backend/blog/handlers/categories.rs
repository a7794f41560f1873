/**
 * Category Handlers
 *
 * - `GET /blog/categories` every category in tree order with its level
 * - `GET /blog/categories/{id}` one category
 * - `GET /blog/categories/{id}/ancestors` path from the root, excluding `id`
 * - `GET /blog/categories/{id}/descendants` subtree in tree order, excluding `id`
 * - `POST`, `PUT|PATCH`, `DELETE` authenticated writes
 *
 * Tree questions are answered by loading all rows into a `CategoryTree`.
 * Re-parenting is checked against the tree so no cycle can be stored, and
 * deleting a category deletes its whole subtree.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::blog::categories::{self, Category};
use crate::backend::blog::category_tree::CategoryTree;
use crate::backend::blog::handlers::blogs::missing_object;
use crate::backend::blog::handlers::types::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::shared::validation::validate_text;

const CATEGORY_NOT_FOUND: &str = "Category not found.";
const TITLE_MAX: usize = 255;

async fn load_tree(pool: &SqlitePool) -> BackendResult<CategoryTree> {
    Ok(CategoryTree::new(categories::all_categories(pool).await?))
}

fn ensure_known(tree: &CategoryTree, id: i64) -> BackendResult<()> {
    if tree.contains(id) {
        Ok(())
    } else {
        Err(BackendError::not_found(CATEGORY_NOT_FOUND))
    }
}

fn with_levels(tree: &CategoryTree, categories: Vec<&Category>) -> Vec<CategoryResponse> {
    categories
        .into_iter()
        .map(|category| CategoryResponse::new(category, tree.level(category.id)))
        .collect()
}

pub async fn list_categories(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<CategoryResponse>>> {
    let tree = load_tree(&pool).await?;
    let listed = tree
        .walk()
        .into_iter()
        .map(|(category, level)| CategoryResponse::new(category, level))
        .collect();
    Ok(Json(listed))
}

pub async fn get_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<CategoryResponse>> {
    let tree = load_tree(&pool).await?;
    let category = tree
        .get(id)
        .ok_or_else(|| BackendError::not_found(CATEGORY_NOT_FOUND))?;
    Ok(Json(CategoryResponse::new(category, tree.level(id))))
}

/// Ancestors of a category, root first
pub async fn category_ancestors(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<Vec<CategoryResponse>>> {
    let tree = load_tree(&pool).await?;
    ensure_known(&tree, id)?;
    Ok(Json(with_levels(&tree, tree.ancestors(id))))
}

/// Descendants of a category in tree order
pub async fn category_descendants(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<Vec<CategoryResponse>>> {
    let tree = load_tree(&pool).await?;
    ensure_known(&tree, id)?;
    Ok(Json(with_levels(&tree, tree.descendants(id))))
}

pub async fn create_category(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> BackendResult<(StatusCode, Json<CategoryResponse>)> {
    validate_text("title", &request.title, Some(TITLE_MAX))?;

    let mut tx = pool.begin().await?;
    let level = match request.parent {
        Some(parent) => {
            let tree = CategoryTree::new(categories::all_categories(&mut *tx).await?);
            if !tree.contains(parent) {
                return Err(BackendError::validation("parent", missing_object(parent)));
            }
            tree.level(parent) + 1
        }
        None => 0,
    };
    let category = categories::insert_category(&mut *tx, &request.title, request.parent).await?;
    tx.commit().await?;

    tracing::info!("Category {} created by {}", category.id, user.0.username);
    Ok((StatusCode::CREATED, Json(CategoryResponse::new(&category, level))))
}

/// Rename or re-parent a category
pub async fn update_category(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateCategoryRequest>,
) -> BackendResult<Json<CategoryResponse>> {
    let mut tx = pool.begin().await?;
    let tree = CategoryTree::new(categories::all_categories(&mut *tx).await?);
    let mut category = tree
        .get(id)
        .cloned()
        .ok_or_else(|| BackendError::not_found(CATEGORY_NOT_FOUND))?;

    if let Some(title) = request.title {
        validate_text("title", &title, Some(TITLE_MAX))?;
        category.title = title;
    }
    if let Some(parent) = request.parent {
        if let Some(parent_id) = parent {
            if !tree.contains(parent_id) {
                return Err(BackendError::validation("parent", missing_object(parent_id)));
            }
            if tree.would_cycle(id, parent_id) {
                tracing::warn!("Rejected re-parenting category {} under {}", id, parent_id);
                return Err(BackendError::validation(
                    "parent",
                    "A category cannot be moved under itself or one of its descendants.",
                ));
            }
        }
        category.parent_id = parent;
    }

    let level = category
        .parent_id
        .map(|parent_id| tree.level(parent_id) + 1)
        .unwrap_or(0);
    let category = categories::update_category(&mut *tx, &category).await?;
    tx.commit().await?;

    tracing::info!("Category {} updated by {}", id, user.0.username);
    Ok(Json(CategoryResponse::new(&category, level)))
}

/// Delete a category with its subtree
pub async fn delete_category(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<MessageResponse>> {
    let mut tx = pool.begin().await?;
    let tree = CategoryTree::new(categories::all_categories(&mut *tx).await?);
    ensure_known(&tree, id)?;

    let removed = categories::delete_categories(&mut tx, &tree.subtree_ids(id)).await?;
    tx.commit().await?;

    tracing::info!("Category {} and {} descendants deleted by {}", id, removed.saturating_sub(1), user.0.username);
    Ok(Json(MessageResponse::new("Category deleted.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::blog::blogs::{get_blog, insert_blog, BlogDraft};
    use crate::backend::test_support::{active_account, auth_user, test_state};
    use pretty_assertions::assert_eq;

    fn create(title: &str, parent: Option<i64>) -> ApiJson<CreateCategoryRequest> {
        ApiJson(CreateCategoryRequest {
            title: title.to_string(),
            parent,
        })
    }

    #[tokio::test]
    async fn test_tree_endpoints() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        let pool = state.db.clone();

        let (_, Json(tech)) = create_category(State(pool.clone()), auth_user(&alice), create("Tech", None))
            .await
            .unwrap();
        let (_, Json(rust)) = create_category(State(pool.clone()), auth_user(&alice), create("Rust", Some(tech.id)))
            .await
            .unwrap();
        let (_, Json(web)) = create_category(State(pool.clone()), auth_user(&alice), create("Axum", Some(rust.id)))
            .await
            .unwrap();
        assert_eq!(web.level, 2);

        let Json(listed) = list_categories(State(pool.clone())).await.unwrap();
        let order: Vec<(&str, usize)> = listed.iter().map(|c| (c.title.as_str(), c.level)).collect();
        assert_eq!(order, vec![("Tech", 0), ("Rust", 1), ("Axum", 2)]);

        let Json(up) = category_ancestors(State(pool.clone()), ApiPath(web.id)).await.unwrap();
        assert_eq!(up.iter().map(|c| c.id).collect::<Vec<_>>(), vec![tech.id, rust.id]);

        let Json(down) = category_descendants(State(pool.clone()), ApiPath(tech.id)).await.unwrap();
        assert_eq!(down.iter().map(|c| c.id).collect::<Vec<_>>(), vec![rust.id, web.id]);

        let err = category_ancestors(State(pool.clone()), ApiPath(999)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reparent_cycle_rejected() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        let pool = state.db.clone();

        let (_, Json(root)) = create_category(State(pool.clone()), auth_user(&alice), create("Root", None))
            .await
            .unwrap();
        let (_, Json(child)) = create_category(State(pool.clone()), auth_user(&alice), create("Child", Some(root.id)))
            .await
            .unwrap();

        let request = UpdateCategoryRequest {
            parent: Some(Some(child.id)),
            ..Default::default()
        };
        let err = update_category(State(pool.clone()), auth_user(&alice), ApiPath(root.id), ApiJson(request))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("parent"));

        let request = UpdateCategoryRequest {
            parent: Some(None),
            ..Default::default()
        };
        let Json(moved) = update_category(State(pool.clone()), auth_user(&alice), ApiPath(child.id), ApiJson(request))
            .await
            .unwrap();
        assert_eq!(moved.parent, None);
        assert_eq!(moved.level, 0);
    }

    #[tokio::test]
    async fn test_delete_subtree_nulls_blog_category() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        let pool = state.db.clone();

        let (_, Json(root)) = create_category(State(pool.clone()), auth_user(&alice), create("Root", None))
            .await
            .unwrap();
        let (_, Json(child)) = create_category(State(pool.clone()), auth_user(&alice), create("Child", Some(root.id)))
            .await
            .unwrap();

        let mut draft = BlogDraft::titled("Post");
        draft.category_id = Some(child.id);
        let blog = insert_blog(&pool, &draft, alice.id).await.unwrap();

        delete_category(State(pool.clone()), auth_user(&alice), ApiPath(root.id))
            .await
            .unwrap();

        let Json(listed) = list_categories(State(pool.clone())).await.unwrap();
        assert!(listed.is_empty());
        let blog = get_blog(&pool, blog.id).await.unwrap().unwrap();
        assert_eq!(blog.category_id, None);
    }
}
