use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use idorlab_types::models::{Post, User};
use tracing::debug;

use crate::{NewPost, NewUser, PostPatch, Storage, StoreError, UserPatch};

/// One table: rows keyed by id plus the counter that assigns the next id.
/// Counter and map live under the same mutex so increment-then-insert is a
/// single critical section — no duplicate ids under concurrent requests.
struct Table<T> {
    rows: HashMap<u64, T>,
    next_id: u64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory backend. Ids are sequential starting at 1 — guessable on
/// purpose, since enumerating them is part of the exercise.
pub struct MemStorage {
    users: Mutex<Table<User>>,
    posts: Mutex<Table<Post>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Table::new()),
            posts: Mutex::new(Table::new()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(table: &Mutex<Table<T>>) -> Result<MutexGuard<'_, Table<T>>, StoreError> {
    table.lock().map_err(|_| StoreError::Poisoned)
}

impl Storage for MemStorage {
    // -- Users --

    fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = lock(&self.users)?;

        if users.rows.values().any(|u| u.username == new.username) {
            return Err(StoreError::UsernameTaken);
        }

        let id = users.next_id;
        users.next_id += 1;

        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
            name: new.name,
            bio: new.bio,
            email: new.email,
            created_at: Utc::now(),
        };
        users.rows.insert(id, user.clone());
        debug!("created user {} ({})", user.username, id);
        Ok(user)
    }

    fn user(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?.rows.get(&id).cloned())
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn update_user(&self, id: u64, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut users = lock(&self.users)?;
        let Some(user) = users.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = Some(email);
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }

        Ok(Some(user.clone()))
    }

    // -- Posts --

    fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut posts = lock(&self.posts)?;

        let id = posts.next_id;
        posts.next_id += 1;

        let post = Post {
            id,
            user_id: new.user_id,
            title: new.title,
            content: new.content,
            visibility: new.visibility,
            created_at: Utc::now(),
        };
        posts.rows.insert(id, post.clone());
        debug!("created post {} by user {}", id, post.user_id);
        Ok(post)
    }

    fn post(&self, id: u64) -> Result<Option<Post>, StoreError> {
        Ok(lock(&self.posts)?.rows.get(&id).cloned())
    }

    fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        let posts = lock(&self.posts)?;
        let mut all: Vec<Post> = posts.rows.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    fn posts_by_user(&self, user_id: u64) -> Result<Vec<Post>, StoreError> {
        let posts = lock(&self.posts)?;
        let mut owned: Vec<Post> = posts
            .rows
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.id);
        Ok(owned)
    }

    fn update_post(&self, id: u64, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let mut posts = lock(&self.posts)?;
        let Some(post) = posts.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(visibility) = patch.visibility {
            post.visibility = visibility;
        }

        Ok(Some(post.clone()))
    }

    fn delete_post(&self, id: u64) -> Result<bool, StoreError> {
        Ok(lock(&self.posts)?.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idorlab_types::models::Visibility;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            name: username.to_string(),
            bio: String::new(),
            email: None,
        }
    }

    fn new_post(user_id: u64, title: &str) -> NewPost {
        NewPost {
            user_id,
            title: title.to_string(),
            content: "some content".to_string(),
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn user_ids_are_sequential_from_one() {
        let store = MemStorage::new();
        let a = store.create_user(new_user("alice")).unwrap();
        let b = store.create_user(new_user("bob")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn duplicate_username_rejected_without_consuming_id() {
        let store = MemStorage::new();
        store.create_user(new_user("alice")).unwrap();

        let err = store.create_user(new_user("alice")).unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));

        // The failed attempt must not have burned an id.
        let b = store.create_user(new_user("bob")).unwrap();
        assert_eq!(b.id, 2);
    }

    #[test]
    fn username_lookup_finds_exact_match() {
        let store = MemStorage::new();
        store.create_user(new_user("alice")).unwrap();
        assert!(store.user_by_username("alice").unwrap().is_some());
        assert!(store.user_by_username("alic").unwrap().is_none());
    }

    #[test]
    fn user_patch_leaves_unset_fields_alone() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("alice")).unwrap();

        let updated = store
            .update_user(
                user.id,
                UserPatch {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.name, "alice");
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[test]
    fn update_unknown_user_is_none() {
        let store = MemStorage::new();
        assert!(store.update_user(42, UserPatch::default()).unwrap().is_none());
    }

    #[test]
    fn posts_by_user_filters_on_author() {
        let store = MemStorage::new();
        store.create_post(new_post(1, "first")).unwrap();
        store.create_post(new_post(2, "second")).unwrap();
        store.create_post(new_post(1, "third")).unwrap();

        let mine = store.posts_by_user(1).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.user_id == 1));
    }

    #[test]
    fn all_posts_sorted_by_id() {
        let store = MemStorage::new();
        for i in 0..5 {
            store.create_post(new_post(1, &format!("post {}", i))).unwrap();
        }
        let all = store.all_posts().unwrap();
        let ids: Vec<u64> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn delete_post_reports_presence() {
        let store = MemStorage::new();
        let post = store.create_post(new_post(1, "bye")).unwrap();
        assert!(store.delete_post(post.id).unwrap());
        assert!(!store.delete_post(post.id).unwrap());
        assert!(store.post(post.id).unwrap().is_none());
    }

    #[test]
    fn post_patch_updates_visibility() {
        let store = MemStorage::new();
        let post = store.create_post(new_post(1, "draft")).unwrap();

        let updated = store
            .update_post(
                post.id,
                PostPatch {
                    visibility: Some(Visibility::Private),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.visibility, Visibility::Private);
        assert_eq!(updated.title, "draft");
    }
}
