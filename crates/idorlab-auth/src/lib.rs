//! Credentials and sessions for IDOR Lab.
//!
//! Passwords are hashed with Argon2id into self-contained PHC strings.
//! Sessions are opaque random tokens mapped to user ids in a flat in-process
//! table — no expiry, no rotation, gone on restart. That is the whole model:
//! the interesting access-control gaps live a layer up, in the handlers.

pub mod password;
pub mod session;

pub use session::SessionRegistry;
