use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo_types::Staff,
    },
    error::AppError,
};

pub const MIN_PASSWORD_LEN: usize = 3;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login names are plain usernames or email addresses.
pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+(@[A-Za-z0-9.-]+\.[A-Za-z]{2,})?$").unwrap();
    }
    (3..=64).contains(&username.chars().count()) && USERNAME_RE.is_match(username)
}

/// Checks a login name and secret. Unknown names and wrong secrets fail
/// with the same message.
pub async fn authenticate(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Staff, AppError> {
    let username = username.trim();

    let Some(staff) = Staff::find_by_username(db, username).await? else {
        warn!(username, "login unknown username");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &staff.password_hash)? {
        warn!(username, staff_id = staff.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    info!(staff_id = staff.id, username, "staff logged in");
    Ok(staff)
}

pub async fn create_staff(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Staff, AppError> {
    let username = username.trim();

    if !is_valid_username(username) {
        return Err(AppError::validation("Invalid username"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if Staff::find_by_username(db, username).await?.is_some() {
        warn!(username, "username already taken");
        return Err(AppError::Conflict(format!("User {username} already exists")));
    }

    let hash = hash_password(password)?;
    match Staff::create(db, username, &hash).await {
        Ok(staff) => {
            info!(staff_id = staff.id, username, "staff created");
            Ok(staff)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(username, "username taken concurrently");
            Err(AppError::Conflict(format!("User {username} already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn username_rules() {
        assert!(is_valid_username("admin"));
        assert!(is_valid_username("recepcion@example.com"));
        assert!(is_valid_username("ana.lopez"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("two@@signs.com"));
    }

    #[tokio::test]
    async fn seeded_admin_can_authenticate() {
        let state = AppState::fake().await.unwrap();
        let staff = authenticate(&state.db, " admin ", "123").await.unwrap();
        assert_eq!(staff.username, "admin");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let state = AppState::fake().await.unwrap();
        let wrong_pw = authenticate(&state.db, "admin", "nope").await.unwrap_err();
        let unknown = authenticate(&state.db, "ghost", "123").await.unwrap_err();
        assert!(matches!(wrong_pw, AppError::Auth(_)));
        assert!(matches!(unknown, AppError::Auth(_)));
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn create_staff_then_login() {
        let state = AppState::fake().await.unwrap();
        let staff = create_staff(&state.db, "guard", "s3cret").await.unwrap();
        assert_ne!(staff.password_hash, "s3cret");
        assert_eq!(authenticate(&state.db, "guard", "s3cret").await.unwrap().id, staff.id);
        assert_eq!(Staff::count(&state.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let state = AppState::fake().await.unwrap();
        let err = create_staff(&state.db, "admin", "whatever").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn unique_constraint_maps_to_conflict() {
        let state = AppState::fake().await.unwrap();
        let err = Staff::create(&state.db, "admin", "x").await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn create_staff_validates_input() {
        let state = AppState::fake().await.unwrap();
        let err = create_staff(&state.db, "no spaces allowed", "123").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = create_staff(&state.db, "shortpw", "12").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
