use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use idorlab_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// The authenticated caller, resolved once per request from the session
/// cookie and passed to handlers as an explicit argument — never ambient
/// state.
///
/// Missing cookie, unknown token, or a token pointing at a vanished user
/// all reject with 401 before the handler body runs, so failed
/// authentication can have no side effects.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::AuthRequired)?;

        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or(ApiError::AuthRequired)?;

        let user_id = state.sessions.resolve(&token).ok_or(ApiError::AuthRequired)?;

        // A stale session can outlive what it points at; treat it as anonymous.
        let user = state.store.user(user_id)?.ok_or(ApiError::AuthRequired)?;

        Ok(CurrentUser(user))
    }
}
