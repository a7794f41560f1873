/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Account routes (`/account/...`)
 * 2. Blog routes (`/blog/...`)
 * 3. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * - `TraceLayer` opens a span per request
 * - `CorsLayer::permissive()` lets browser clients on other origins call
 *   the API
 */

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::account_routes::configure_account_routes;
use crate::backend::routes::blog_routes::configure_blog_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();

    let router = configure_account_routes(router);
    let router = configure_blog_routes(router);

    // Unknown paths get the same JSON error body as everything else
    let router = router.fallback(|| async { BackendError::not_found("Not found.") });

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let (state, _) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 404);
    }

    #[tokio::test]
    async fn test_public_list_routes() {
        let (state, _) = test_state().await;
        let app = create_router(state);

        for uri in ["/blog/blogs", "/blog/comments", "/blog/tags", "/blog/menus", "/blog/categories", "/account/user"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_writes_need_a_token() {
        let (state, _) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/blog/tags")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"rust"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
