//! HTTP surface of IDOR Lab — an intentionally-vulnerable JSON API.
//!
//! The by-id endpoints resolve resources straight from path parameters
//! without checking that the caller owns them. Those missing checks are the
//! point of the application; do not add them.
//!
//! [`router`] builds the full route set over an [`auth::AppState`]; the
//! server binary wraps it with CORS and tracing layers.

pub mod auth;
pub mod error;
pub mod extract;
pub mod posts;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use posts::PostListPolicy;

/// Assemble the API router. Handlers taking a
/// [`CurrentUser`](extract::CurrentUser) argument reject unauthenticated
/// requests with 401; register, login, logout, and the health probe are
/// public.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route(
            "/api/user",
            get(auth::current_user).patch(auth::update_current_user),
        )
        .route("/api/user/{id}", get(users::get_user).put(users::update_user))
        .route("/api/user/{id}/posts", get(posts::user_posts))
        .route("/api/post", post(posts::create_post))
        .route("/api/posts", get(posts::list_posts))
        .route(
            "/api/post/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health — liveness check (no auth).
async fn health() -> &'static str {
    "ok"
}
