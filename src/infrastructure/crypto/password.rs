//! Password hashing utilities

use bcrypt::{hash, verify};

/// bcrypt work factor used when none is configured
pub const DEFAULT_HASH_COST: u32 = 10;

/// Hash a password using bcrypt with the given work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("temporary-123", 4).unwrap();
        assert_ne!(hashed, "temporary-123");
        assert!(verify_password("temporary-123", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn salted_hashes_differ() {
        let a = hash_password("same", 4).unwrap();
        let b = hash_password("same", 4).unwrap();
        assert_ne!(a, b);
    }
}
