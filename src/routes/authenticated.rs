use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Authenticated Router Module
///
/// Every route here sits behind `auth::require_bearer_token`, applied as a
/// route layer in `create_router`. Post-scoped handlers additionally run the
/// ownership guard before touching the resource.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /posts?page_id=&page_size=, POST /posts
        .route(
            "/posts",
            get(handlers::get_all_posts).post(handlers::create_post),
        )
        // GET/PUT/DELETE /posts/{id}
        // Owner-only.
        .route(
            "/posts/{id}",
            get(handlers::get_post_by_id)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        // --- Images of a post (owner-only) ---
        .route(
            "/posts/{id}/images",
            get(handlers::list_images).post(handlers::create_image),
        )
        .route(
            "/posts/{id}/images/{image_id}",
            get(handlers::get_image)
                .put(handlers::update_image)
                .delete(handlers::delete_image),
        )
}
