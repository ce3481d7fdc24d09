use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ipagency_core_types::Sensitive;

/// Hash a secret with Argon2id and a random salt, returning a PHC string
pub fn hash_secret(secret: &Sensitive<String>) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.expose().as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// One-way comparison of a candidate secret against a stored hash.
///
/// A stored value that is not a PHC string never verifies.
pub fn verify_secret(candidate: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_secret(&Sensitive::new("123456".to_string())).unwrap();
        assert_ne!(hashed, "123456");
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify_secret("123456", &hashed));
        assert!(!verify_secret("654321", &hashed));
    }

    #[test]
    fn test_same_secret_hashes_differently() {
        let a = hash_secret(&Sensitive::new("pw".to_string())).unwrap();
        let b = hash_secret(&Sensitive::new("pw".to_string())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plaintext_never_verifies_against_itself() {
        assert!(!verify_secret("plain", "plain"));
    }
}
