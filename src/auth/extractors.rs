use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::session::{SessionKeys, SESSION_COOKIE};
use crate::{
    state::AppState,
    web::{
        cookies::{clear_cookie, read_cookie},
        flash::FlashRedirect,
    },
};

/// Authenticated staff member, taken from the session cookie or a bearer token.
/// Requests without a valid session are redirected to `/login`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = FlashRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, SESSION_COOKIE).or_else(|| {
            parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
        });

        let Some(token) = token else {
            return Err(FlashRedirect::info("/login", "Please log in to continue"));
        };

        let keys = SessionKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser {
                id: claims.sub,
                username: claims.name,
            }),
            Err(e) => {
                warn!(error = %e, "invalid or expired session");
                Err(
                    FlashRedirect::info("/login", "Your session has expired, please log in again")
                        .with_cookie(clear_cookie(SESSION_COOKIE)),
                )
            }
        }
    }
}

/// The configured admin identity. Other staff are sent back to `/list`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = FlashRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.username != state.config.admin.username {
            warn!(staff_id = user.id, username = %user.username, "admin route denied");
            return Err(FlashRedirect::error("/list", "Access denied: admin only"));
        }
        Ok(AdminUser(user))
    }
}
