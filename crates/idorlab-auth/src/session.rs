use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand_core::{OsRng, RngCore};

/// Bytes of entropy per session token. 32 bytes (256 bits) hex-encodes to a
/// 64-character cookie value.
const TOKEN_BYTES: usize = 32;

/// Opaque session token → user id.
///
/// The registry owns this mapping exclusively. It never checks the user
/// still exists — resolution is a pure table lookup, and whatever the id
/// points at is the caller's problem.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, u64>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an unguessable token and bind it to `user_id`.
    pub fn create(&self, user_id: u64) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.table().insert(token.clone(), user_id);
        token
    }

    /// Look up the user id behind a token. Unknown tokens are anonymous.
    pub fn resolve(&self, token: &str) -> Option<u64> {
        self.table().get(token).copied()
    }

    /// Drop a token. Destroying an absent token is a no-op.
    pub fn destroy(&self, token: &str) {
        self.table().remove(token);
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        // A poisoned lock only means another request panicked mid-insert;
        // the map itself is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_resolve() {
        let registry = SessionRegistry::new();
        let token = registry.create(7);
        assert_eq!(registry.resolve(&token), Some(7));
    }

    #[test]
    fn destroy_is_idempotent() {
        let registry = SessionRegistry::new();
        let token = registry.create(7);
        registry.destroy(&token);
        assert_eq!(registry.resolve(&token), None);
        registry.destroy(&token); // no-op
        assert_eq!(registry.resolve(&token), None);
    }

    #[test]
    fn unknown_token_is_anonymous() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.resolve("deadbeef"), None);
        assert_eq!(registry.resolve(""), None);
    }

    #[test]
    fn tokens_are_hex_and_distinct() {
        let registry = SessionRegistry::new();
        let a = registry.create(1);
        let b = registry.create(1);
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        // Both sessions stay valid — no concurrent-session limit.
        assert_eq!(registry.resolve(&a), Some(1));
        assert_eq!(registry.resolve(&b), Some(1));
    }
}
