//! Admin password hashing (Argon2id, PHC string format).
//!
//! `ADMIN_PASSWORD_HASH` is produced by [`hash_password`] and checked on
//! every login by [`verify_password`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `Ok(false)` for a wrong password. `Err` only when `hash` is not a valid
/// PHC string, which points at bad configuration rather than a bad login.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let stored = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_password_verifies_against_its_hash() {
        let hash = hash_password("lotus-and-peacock").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("lotus-and-peacock", &hash).unwrap());
        assert!(!verify_password("Lotus-and-peacock", &hash).unwrap());
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn garbage_hash_is_a_configuration_error() {
        assert!(verify_password("anything", "plaintext-by-mistake").is_err());
    }
}
