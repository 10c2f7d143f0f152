use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::warn;

/// Argon2 PHC string for a staff login secret. The salt is fresh per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("hash staff password: {e}"))
}

/// `Ok(false)` means the secret does not match; `Err` means the stored hash
/// could not be read at all.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = PasswordHash::new(stored).map_err(|e| {
        warn!(error = %e, "stored staff password hash is unreadable");
        anyhow::anyhow!("parse stored staff password hash: {e}")
    })?;
    let matched = Argon2::default()
        .verify_password(plain.as_bytes(), &phc)
        .is_ok();
    Ok(matched)
}
