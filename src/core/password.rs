use crate::error::{Result, SetupError};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let argon2 = Argon2::default();

    // Generate a random salt
    let mut rng = rand::thread_rng();
    let mut salt_bytes = [0u8; 16];
    rng.fill(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| SetupError::AccountService(format!("failed to encode salt: {}", e)))?;

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SetupError::AccountService(format!("failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| SetupError::AccountService(format!("failed to parse password hash: {}", e)))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SetupError::AccountService(format!(
            "password verification error: {}",
            e
        ))),
    }
}
