use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{CreateUserForm, LoginForm},
        extractors::AdminUser,
        services::{authenticate, create_staff},
        session::{SessionKeys, SESSION_COOKIE},
    },
    error::AppError,
    state::AppState,
    web::{cookies::clear_cookie, flash::FlashRedirect, flash::IncomingFlash, FormPage, Page},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/create_user", get(create_user_page).post(create_user))
}

const CREDENTIAL_FIELDS: &[&str] = &["username", "password"];

pub async fn login_page(flash: IncomingFlash) -> Page<FormPage> {
    Page::new(
        flash,
        FormPage {
            form: "login",
            action: "/login",
            fields: CREDENTIAL_FIELDS,
        },
    )
}

#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let staff = match authenticate(&state.db, &form.username, &form.password).await {
        Ok(s) => s,
        Err(e) => return e.redirect_to("/login"),
    };

    let keys = SessionKeys::from_ref(&state);
    let token = match keys.sign(staff.id, &staff.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session sign failed");
            return AppError::Internal(e).into_response();
        }
    };

    FlashRedirect::success("/list", format!("Welcome, {}", staff.username))
        .with_cookie(keys.session_cookie(&token))
        .into_response()
}

pub async fn logout() -> FlashRedirect {
    FlashRedirect::info("/login", "You have been logged out")
        .with_cookie(clear_cookie(SESSION_COOKIE))
}

pub async fn create_user_page(_admin: AdminUser, flash: IncomingFlash) -> Page<FormPage> {
    Page::new(
        flash,
        FormPage {
            form: "create_user",
            action: "/create_user",
            fields: CREDENTIAL_FIELDS,
        },
    )
}

#[instrument(skip(state, form))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<CreateUserForm>,
) -> Response {
    match create_staff(&state.db, &form.username, &form.password).await {
        Ok(staff) => {
            info!(staff_id = staff.id, created_by = admin.id, "user created");
            FlashRedirect::success("/list", format!("User {} created", staff.username))
                .into_response()
        }
        Err(e) => e.redirect_to("/create_user"),
    }
}
