use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

impl From<argon2::password_hash::Error> for PasswordError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        Self(inner.to_string())
    }
}

/// Well-formed Argon2id hash with the default cost parameters that no password matches.
/// Verifying against it costs the same as verifying against a real account.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$QG+RS9HfJ649CTVJLTIqmw$xQyv67ETiQjnXv34CZoPkL8vkaFvXX12uV3xzqmJS4c";

/// Hashes `plain` with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `plain` against a stored PHC hash.
///
/// A stored hash that cannot be parsed is treated as a mismatch so that a corrupt row can
/// never authenticate anyone.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("repeat").unwrap();
        let second = hash_password("repeat").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn dummy_hash_parses_with_default_cost() {
        let parsed = PasswordHash::new(DUMMY_HASH).unwrap();
        let real = hash_password("whatever").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(parsed.algorithm.as_str(), real.algorithm.as_str());
        assert_eq!(parsed.params.to_string(), real.params.to_string());

        assert!(!verify_password("", DUMMY_HASH));
        assert!(!verify_password("admin123", DUMMY_HASH));
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }
}
