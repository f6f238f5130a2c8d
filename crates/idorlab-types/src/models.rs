use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as stored by the server.
///
/// `password_hash` never leaves the process — every response path goes
/// through [`crate::api::UserResponse`], which omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post. `user_id` records the author but nothing enforces it on the
/// mutation paths — that gap is what this application teaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

/// Whether non-owners may see a post through the filtered listing paths.
/// The by-id endpoints ignore it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Visibility::Public).unwrap(),
            serde_json::json!("public")
        );
        assert_eq!(
            serde_json::from_str::<Visibility>("\"private\"").unwrap(),
            Visibility::Private
        );
    }
}
