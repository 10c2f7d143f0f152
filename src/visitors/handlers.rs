use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::{debug, info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    state::AppState,
    visitors::{
        dto::{CheckInForm, HistoryPage, ListPage},
        services::{self, CheckoutOutcome},
    },
    web::{
        flash::{FlashRedirect, IncomingFlash},
        FormPage, Page,
    },
};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/register", get(register_page).post(register))
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list))
        .route("/checkout/:id", get(checkout))
        .route("/history", get(history))
}

pub async fn register_page(flash: IncomingFlash) -> Page<FormPage> {
    Page::new(
        flash,
        FormPage {
            form: "register",
            action: "/register",
            fields: &["name", "company", "reason", "host"],
        },
    )
}

#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<CheckInForm>) -> Response {
    match services::check_in(&state.db, form).await {
        Ok(v) => FlashRedirect::success("/list", format!("{} checked in", v.name)).into_response(),
        Err(e) => e.redirect_to("/register"),
    }
}

#[instrument(skip(state, flash))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser { id: staff_id, .. }: AuthUser,
    flash: IncomingFlash,
) -> Result<Page<ListPage>, AppError> {
    let page = services::list(&state.db).await?;
    debug!(staff_id, inside = page.inside_count, "list viewed");
    Ok(Page::new(flash, page))
}

#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser { id: staff_id, .. }: AuthUser,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return AppError::NotFound(format!("Visitor {id} not found")).redirect_to("/list");
    };
    match services::check_out(&state.db, id).await {
        Ok(CheckoutOutcome::CheckedOut(v)) => {
            info!(visitor_id = v.id, staff_id, "check-out recorded");
            FlashRedirect::success("/list", format!("{} checked out", v.name)).into_response()
        }
        Ok(CheckoutOutcome::AlreadyCheckedOut(v)) => {
            FlashRedirect::info("/list", format!("{} had already checked out", v.name))
                .into_response()
        }
        Err(e) => e.redirect_to("/list"),
    }
}

#[instrument(skip(state, flash))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser { id: staff_id, .. }: AuthUser,
    flash: IncomingFlash,
) -> Result<Page<HistoryPage>, AppError> {
    let page = services::history(&state.db).await?;
    debug!(staff_id, records = page.visitors.len(), "history viewed");
    Ok(Page::new(flash, page))
}
