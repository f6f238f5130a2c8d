use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use idorlab_store::{NewPost, PostPatch};
use idorlab_types::api::{CreatePostRequest, UpdatePostRequest};
use idorlab_types::models::{Post, Visibility};

use crate::auth::AppState;
use crate::error::{ApiError, FieldError};
use crate::extract::CurrentUser;

/// Which posts `GET /api/posts` returns. The upstream design shipped both
/// behaviors in different code paths; here the choice is explicit
/// configuration instead of an accident of routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostListPolicy {
    /// Every post, private ones included, to any authenticated caller.
    Open,
    /// Public posts plus the caller's own.
    #[default]
    Filtered,
}

impl FromStr for PostListPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "filtered" => Ok(Self::Filtered),
            other => Err(format!(
                "unknown post list policy '{}' (expected 'open' or 'filtered')",
                other
            )),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

/// POST /api/post — create a post authored by the caller.
///
/// The author is always the session's user. Any author id a client smuggles
/// into the body is dropped during deserialization.
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut fields = Vec::new();
    if req.title.trim().is_empty() {
        fields.push(FieldError {
            field: "title",
            message: "is required",
        });
    }
    if req.content.trim().is_empty() {
        fields.push(FieldError {
            field: "content",
            message: "is required",
        });
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation(fields));
    }

    let post = state.store.create_post(NewPost {
        user_id: caller.id,
        title: req.title,
        content: req.content,
        visibility: req.visibility.unwrap_or_default(),
    })?;

    info!("post {} created by user {}", post.id, caller.id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts — list posts per the configured policy.
pub async fn list_posts(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    let all = state.store.all_posts()?;

    let posts = match state.post_list_policy {
        // Everything for everyone: visibility is stored but never consulted.
        PostListPolicy::Open => all,
        PostListPolicy::Filtered => all
            .into_iter()
            .filter(|p| p.visibility == Visibility::Public || p.user_id == caller.id)
            .collect(),
    };

    Ok(Json(posts))
}

/// GET /api/post/{id} — fetch any post by id.
///
/// Neither visibility nor ownership is checked: knowing (or guessing) an id
/// is enough to read a private post. The canonical IDOR read.
pub async fn get_post(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<Post>, ApiError> {
    let post = state.store.post(id)?.ok_or(ApiError::NotFound("Post"))?;
    Ok(Json(post))
}

/// PUT /api/post/{id} — update any post by id, caller unchecked.
pub async fn update_post(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let mut fields = Vec::new();
    if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        fields.push(FieldError {
            field: "title",
            message: "must not be empty",
        });
    }
    if req.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        fields.push(FieldError {
            field: "content",
            message: "must not be empty",
        });
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation(fields));
    }

    let patch = PostPatch {
        title: req.title,
        content: req.content,
        visibility: req.visibility,
    };
    let updated = state
        .store
        .update_post(id, patch)?
        .ok_or(ApiError::NotFound("Post"))?;
    Ok(Json(updated))
}

/// DELETE /api/post/{id} — delete any post by id, caller unchecked.
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_post(id)? {
        return Err(ApiError::NotFound("Post"));
    }

    info!("post {} deleted by user {}", id, caller.id);
    Ok(Json(json!({ "success": true })))
}

/// GET /api/user/{id}/posts — a user's posts.
///
/// The one place with a partial guard: other people's lists are trimmed to
/// public posts. The by-id endpoints right above make the trim pointless,
/// which is exactly the lesson.
pub async fn user_posts(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.store.posts_by_user(id)?;

    let posts = if id == caller.id {
        posts
    } else {
        posts
            .into_iter()
            .filter(|p| p.visibility == Visibility::Public)
            .collect()
    };

    Ok(Json(posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_known_values() {
        assert_eq!("open".parse::<PostListPolicy>().unwrap(), PostListPolicy::Open);
        assert_eq!(
            "filtered".parse::<PostListPolicy>().unwrap(),
            PostListPolicy::Filtered
        );
    }

    #[test]
    fn policy_rejects_unknown_values() {
        let err = "everything".parse::<PostListPolicy>().unwrap_err();
        assert!(err.contains("everything"));
    }
}
