use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tracing::info;

use idorlab_auth::SessionRegistry;
use idorlab_auth::password::{hash_password, verify_password};
use idorlab_store::{NewUser, Storage, UserPatch};
use idorlab_types::api::{LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse};

use crate::error::{ApiError, FieldError};
use crate::extract::{CurrentUser, SESSION_COOKIE};
use crate::posts::PostListPolicy;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Storage>,
    pub sessions: SessionRegistry,
    pub post_list_policy: PostListPolicy,
}

/// Session cookie as transmitted to browsers: HTTP-only, lax, site-root.
/// Not `Secure` — this server is meant to run on a lab loopback.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /api/register — create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut fields = Vec::new();
    if req.username.len() < 3 || req.username.len() > 32 {
        fields.push(FieldError {
            field: "username",
            message: "must be 3 to 32 characters",
        });
    }
    if req.password.len() < 8 {
        fields.push(FieldError {
            field: "password",
            message: "must be at least 8 characters",
        });
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation(fields));
    }

    let password_hash = hash_password(&req.password).map_err(ApiError::Internal)?;

    // Display name falls back to the username, bio to empty.
    let name = req.name.filter(|n| !n.is_empty()).unwrap_or_else(|| req.username.clone());
    let user = state.store.create_user(NewUser {
        username: req.username,
        password_hash,
        name,
        bio: req.bio.unwrap_or_default(),
        email: req.email,
    })?;

    info!("registered user {} ({})", user.username, user.id);

    let token = state.sessions.create(user.id);
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token)),
        Json(UserResponse::from(user)),
    ))
}

/// POST /api/login — verify credentials and open a session.
///
/// Unknown username and wrong password produce the same response, so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .user_by_username(&req.username)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    info!("user {} logged in", user.username);

    let token = state.sessions.create(user.id);
    Ok((jar.add(session_cookie(token)), Json(UserResponse::from(user))))
}

/// POST /api/logout — destroy the session, if any, and clear the cookie.
/// Succeeds whether or not a session was presented.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(json!({ "success": true })))
}

/// GET /api/user — the caller's own profile.
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// PATCH /api/user — update the caller's own profile (name/email/bio).
pub async fn update_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let patch = UserPatch {
        name: req.name,
        email: req.email,
        bio: req.bio,
    };
    let updated = state
        .store
        .update_user(user.id, patch)?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(updated.into()))
}
