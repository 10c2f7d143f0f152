use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser,
    reports::{dto::ReportQuery, services::run_report},
    state::AppState,
    web::{flash::IncomingFlash, Page},
};

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/reports", get(reports))
}

#[instrument(skip(state, flash))]
pub async fn reports(
    State(state): State<AppState>,
    AuthUser { id: staff_id, .. }: AuthUser,
    flash: IncomingFlash,
    Query(query): Query<ReportQuery>,
) -> Response {
    match run_report(&state.db, query).await {
        Ok(page) => {
            debug!(staff_id, matched = page.visitors.len(), "report viewed");
            Page::new(flash, page).into_response()
        }
        Err(e) => e.redirect_to("/reports"),
    }
}
