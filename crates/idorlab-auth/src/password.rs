use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a password with Argon2id and a fresh random salt.
///
/// The returned PHC string carries the algorithm parameters and the salt, so
/// verification needs nothing but the string itself.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a supplied password against a stored PHC string.
///
/// The comparison inside argon2 is constant-time. A malformed stored form
/// fails closed: the answer is `false`, never a panic or an error.
pub fn verify_password(supplied: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(supplied.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_verifies() {
        let stored = hash_password("pw123456").unwrap();
        assert!(verify_password("pw123456", &stored));
    }

    #[test]
    fn wrong_password_rejected() {
        let stored = hash_password("pw123456").unwrap();
        assert!(!verify_password("pw654321", &stored));
    }

    #[test]
    fn salts_make_hashes_unique() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same password", &a));
        assert!(verify_password("same password", &b));
    }

    #[test]
    fn malformed_stored_form_fails_closed() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", "$argon2id$v=19$truncated"));
    }
}
