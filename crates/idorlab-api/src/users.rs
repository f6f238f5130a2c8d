use axum::{
    Json,
    extract::{Path, State},
};

use idorlab_store::UserPatch;
use idorlab_types::api::{UpdateUserRequest, UserResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// GET /api/user/{id} — any authenticated caller can read any profile.
///
/// The id comes straight from the path and is never compared against the
/// caller. This is the read half of the user-level IDOR.
pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.user(id)?.ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user.into()))
}

/// PUT /api/user/{id} — update name/email/bio of whichever user the path
/// names, caller unchecked. The write half of the user-level IDOR.
/// Username and password stay immutable: the patch type cannot carry them.
pub async fn update_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<u64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let patch = UserPatch {
        name: req.name,
        email: req.email,
        bio: req.bio,
    };
    let updated = state
        .store
        .update_user(id, patch)?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(updated.into()))
}
