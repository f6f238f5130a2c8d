use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{User, Visibility};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user as returned to clients — everything except the credential.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

// -- Profiles --

/// Partial profile update. Absent fields are left unchanged; username and
/// password are not reachable through this type at all.
///
/// Unknown fields are deliberately tolerated (and dropped), matching the
/// loose request handling under study here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

// -- Posts --

/// Unknown fields (including a smuggled author id) are accepted and
/// ignored — the server always stamps the caller as the author.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
}
