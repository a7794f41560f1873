/**
 * Blog Routes
 *
 * Every resource gets the same five routes:
 *
 * - `GET /blog/<resource>` - List
 * - `POST /blog/<resource>` - Create (requires authentication)
 * - `GET /blog/<resource>/{id}` - Retrieve
 * - `PUT|PATCH /blog/<resource>/{id}` - Partial update (requires authentication)
 * - `DELETE /blog/<resource>/{id}` - Delete (requires authentication)
 *
 * Categories add `GET /blog/categories/{id}/ancestors` and
 * `GET /blog/categories/{id}/descendants`.
 */

use axum::routing::get;
use axum::Router;

use crate::backend::blog::handlers::{blogs, categories, comments, menus, tags};
use crate::backend::server::state::AppState;

/// Configure blog routes
pub fn configure_blog_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/blog/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route(
            "/blog/blogs/{id}",
            get(blogs::get_blog)
                .put(blogs::update_blog)
                .patch(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route(
            "/blog/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/blog/comments/{id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/blog/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/blog/tags/{id}",
            get(tags::get_tag)
                .put(tags::update_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/blog/menus", get(menus::list_menus).post(menus::create_menu))
        .route(
            "/blog/menus/{id}",
            get(menus::get_menu)
                .put(menus::update_menu)
                .patch(menus::update_menu)
                .delete(menus::delete_menu),
        )
        .route(
            "/blog/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/blog/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/blog/categories/{id}/ancestors",
            get(categories::category_ancestors),
        )
        .route(
            "/blog/categories/{id}/descendants",
            get(categories::category_descendants),
        )
}
