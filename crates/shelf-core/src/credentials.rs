//! # Credentials
//!
//! Salted password digests for the user directory.
//!
//! ## Stored Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  signup:                                                                │
//! │    salt = hex(16 random bytes from OsRng)       -- 32 lowercase chars   │
//! │    hash = hex(SHA-256(password + ":" + salt))   -- 64 lowercase chars   │
//! │    users(password_hash = hash, salt = salt)                             │
//! │                                                                         │
//! │  login:                                                                 │
//! │    recompute with stored salt, compare with stored hash                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The digest format is fixed so accounts created by earlier deployments
//! keep working.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Salt length in bytes (128 bits).
pub const SALT_LENGTH: usize = 16;

/// Generates a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt_bytes);
    hex::encode(salt_bytes)
}

/// Hashes `password` with `salt`.
///
/// ## Example
/// ```rust
/// use shelf_core::credentials::hash_password;
///
/// let a = hash_password("secret", "00ff");
/// assert_eq!(a, hash_password("secret", "00ff"));
/// assert_ne!(a, hash_password("secret", "00fe"));
/// assert_eq!(a.len(), 64);
/// ```
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(b":");
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks `password` against a stored hash and salt.
///
/// The digests are compared in constant time.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let computed = hash_password(password, salt);
    computed.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_shape() {
        let salt = generate_salt();
        assert_eq!(salt.len(), SALT_LENGTH * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(salt, generate_salt());
    }

    #[test]
    fn test_hash_is_deterministic_and_salt_sensitive() {
        let salt = "0123456789abcdef0123456789abcdef";
        let first = hash_password("hunter2", salt);
        assert_eq!(first, hash_password("hunter2", salt));
        assert_ne!(first, hash_password("hunter2", "fedcba9876543210fedcba9876543210"));
        assert_ne!(first, hash_password("hunter3", salt));
    }

    #[test]
    fn test_hash_matches_known_digest() {
        // sha256("pw:s")
        assert_eq!(
            hash_password("pw", "s"),
            hex::encode(Sha256::digest(b"pw:s"))
        );
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &hash));
        assert!(!verify_password("wrong horse", &salt, &hash));
        assert!(!verify_password("correct horse", &salt, "short"));
    }

    #[test]
    fn test_verify_rejects_near_misses() {
        let salt = "0123456789abcdef0123456789abcdef";
        let hash = hash_password("pw", salt);

        // Same length, last character flipped.
        let mut tampered = hash.clone();
        let last = if tampered.ends_with('0') { "1" } else { "0" };
        tampered.replace_range(63.., last);
        assert!(!verify_password("pw", salt, &tampered));

        assert!(!verify_password("pw", salt, ""));
    }
}
