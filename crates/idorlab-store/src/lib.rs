//! Storage abstraction for IDOR Lab.
//!
//! The [`Storage`] trait is the seam between the HTTP handlers and the data
//! they operate on. The sole backend here is [`MemStorage`] — two
//! mutex-guarded keyed maps with monotonically incremented integer ids. A
//! persistent backend could be swapped in without touching the handler
//! contract. Nothing survives a restart; durability is an explicit non-goal.

pub mod memory;

use idorlab_types::models::{Post, User, Visibility};
use thiserror::Error;

pub use memory::MemStorage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    UsernameTaken,
    #[error("store mutex poisoned")]
    Poisoned,
}

/// Input for creating a user. The id and creation timestamp are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub email: Option<String>,
}

/// Partial user update. `None` leaves the field unchanged. Username and
/// password are intentionally absent — they are immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: u64,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
}

/// Keyed CRUD over users and posts.
///
/// The contract is deliberately thin: lookups by id, one linear-scan lookup
/// by username, and whole-table listings the callers filter themselves.
/// There is no "get post for owner" operation — ownership enforcement (or
/// its absence) is the handlers' business, not the store's.
pub trait Storage: Send + Sync {
    // -- Users --

    /// Assigns the next id and persists the user. Fails with
    /// [`StoreError::UsernameTaken`] without consuming an id if the
    /// username is already registered.
    fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    fn user(&self, id: u64) -> Result<Option<User>, StoreError>;

    /// Linear scan over all users.
    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Applies a partial update in place. Returns the updated user, or
    /// `None` if the id is unknown.
    fn update_user(&self, id: u64, patch: UserPatch) -> Result<Option<User>, StoreError>;

    // -- Posts --

    fn create_post(&self, new: NewPost) -> Result<Post, StoreError>;

    fn post(&self, id: u64) -> Result<Option<Post>, StoreError>;

    fn all_posts(&self) -> Result<Vec<Post>, StoreError>;

    fn posts_by_user(&self, user_id: u64) -> Result<Vec<Post>, StoreError>;

    fn update_post(&self, id: u64, patch: PostPatch) -> Result<Option<Post>, StoreError>;

    /// Returns `true` if a post was removed, `false` for an unknown id.
    fn delete_post(&self, id: u64) -> Result<bool, StoreError>;
}
