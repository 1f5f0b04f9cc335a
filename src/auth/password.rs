/// Hash a password with the configured bcrypt cost.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, cost)
}

/// Verify a password against a stored bcrypt hash. A malformed stored
/// hash verifies as false rather than surfacing an error to the caller.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost; keeps hashing fast in tests
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("pw123456", TEST_COST).unwrap();
        assert!(verify_password("pw123456", &hash));
        assert!(!verify_password("pw1234567", &hash));
    }

    #[test]
    fn hash_is_not_the_plain_password() {
        let hash = hash_password("pw123456", TEST_COST).unwrap();
        assert_ne!(hash, "pw123456");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("pw123456", "not-a-bcrypt-hash"));
    }
}
