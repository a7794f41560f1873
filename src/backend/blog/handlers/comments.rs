/**
 * Comment Handlers
 *
 * - `GET /blog/comments` paginated list, newest first, optional `blog` filter
 * - `POST /blog/comments` create (authenticated)
 * - `GET /blog/comments/{id}` retrieve with replies
 * - `PUT|PATCH /blog/comments/{id}` edit content or counters (author only)
 * - `DELETE /blog/comments/{id}` delete with all replies (author only)
 *
 * Every returned comment carries its reply subtree, built from all comments
 * of the blog and capped at `max_reply_depth` levels.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::blog::blogs::blog_exists;
use crate::backend::blog::comment_tree::{CommentNode, ReplyIndex};
use crate::backend::blog::comments::{self, Comment};
use crate::backend::blog::handlers::blogs::missing_object;
use crate::backend::blog::handlers::types::{CommentListQuery, CreateCommentRequest, UpdateCommentRequest};
use crate::backend::blog::pagination::{Page, PageWindow};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::validation::validate_text;

const COMMENT_NOT_FOUND: &str = "Comment not found.";
const NOT_AUTHOR: &str = "You can't modify this comment.";

/// Attach reply threads to `roots`
async fn with_replies(state: &AppState, roots: Vec<Comment>) -> BackendResult<Vec<CommentNode>> {
    let mut blog_ids: Vec<i64> = roots.iter().map(|comment| comment.blog_id).collect();
    blog_ids.sort_unstable();
    blog_ids.dedup();

    let index = ReplyIndex::new(comments::comments_for_blogs(&state.db, &blog_ids).await?);
    Ok(roots
        .iter()
        .map(|comment| index.thread(comment, state.config.max_reply_depth))
        .collect())
}

async fn authored_comment(state: &AppState, user: &AuthUser, id: i64) -> BackendResult<Comment> {
    let comment = comments::get_comment(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found(COMMENT_NOT_FOUND))?;

    if comment.author_id != user.0.account_id {
        tracing::warn!("User {} tried to modify comment {}", user.0.username, id);
        return Err(BackendError::forbidden(NOT_AUTHOR));
    }
    Ok(comment)
}

fn check_count(field: &str, value: i64) -> BackendResult<i64> {
    if value < 0 {
        return Err(BackendError::validation(
            field,
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(value)
}

/// List comments
pub async fn list_comments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommentListQuery>,
) -> BackendResult<Json<Page<CommentNode>>> {
    let window = PageWindow::resolve(
        query.page,
        query.page_size,
        state.config.page_size,
        state.config.max_page_size,
    )?;

    let count = comments::count_comments(&state.db, query.blog).await?;
    window.check(count)?;

    let page = comments::list_comments(&state.db, query.blog, window.limit(), window.offset()).await?;
    let results = with_replies(&state, page).await?;
    Ok(Json(window.into_page(count, results)))
}

/// Retrieve one comment with its replies
pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<CommentNode>> {
    let comment = comments::get_comment(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found(COMMENT_NOT_FOUND))?;

    let node = with_replies(&state, vec![comment])
        .await?
        .pop()
        .ok_or_else(|| BackendError::internal("reply thread missing"))?;
    Ok(Json(node))
}

/// Comment on a blog, optionally as a reply
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> BackendResult<(StatusCode, Json<CommentNode>)> {
    validate_text("content", &request.content, None)?;

    if !blog_exists(&state.db, request.blog).await? {
        return Err(BackendError::validation("blog", missing_object(request.blog)));
    }

    if let Some(parent_id) = request.parent_comment {
        let parent = comments::get_comment(&state.db, parent_id)
            .await?
            .ok_or_else(|| BackendError::validation("parent_comment", missing_object(parent_id)))?;
        if parent.blog_id != request.blog {
            return Err(BackendError::validation(
                "parent_comment",
                "Parent comment belongs to a different blog.",
            ));
        }
    }

    let comment = comments::insert_comment(
        &state.db,
        request.blog,
        user.0.account_id,
        &request.content,
        request.parent_comment,
    )
    .await?;

    tracing::info!("Comment {} added to blog {} by {}", comment.id, comment.blog_id, user.0.username);
    Ok((StatusCode::CREATED, Json(CommentNode::leaf(comment))))
}

/// Edit a comment
pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateCommentRequest>,
) -> BackendResult<Json<CommentNode>> {
    let mut comment = authored_comment(&state, &user, id).await?;

    if let Some(content) = request.content {
        validate_text("content", &content, None)?;
        comment.content = content;
    }
    if let Some(like) = request.like {
        comment.like = check_count("like", like)?;
    }
    if let Some(dislike) = request.dislike {
        comment.dislike = check_count("dislike", dislike)?;
    }

    let comment = comments::update_comment(&state.db, &comment).await?;
    let node = with_replies(&state, vec![comment])
        .await?
        .pop()
        .ok_or_else(|| BackendError::internal("reply thread missing"))?;

    tracing::info!("Comment {} updated by {}", id, user.0.username);
    Ok(Json(node))
}

/// Delete a comment and its replies
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<MessageResponse>> {
    authored_comment(&state, &user, id).await?;
    comments::delete_comment(&state.db, id).await?;

    tracing::info!("Comment {} deleted by {}", id, user.0.username);
    Ok(Json(MessageResponse::new("Comment deleted.")))
}
