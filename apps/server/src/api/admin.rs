use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use serde::Serialize;
use smartbudget_core::admin::AdminStats;

use super::page;
use crate::{
    auth::CurrentUser,
    error::{audited, ApiResult},
    flash::{Flash, Flashes},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminDashboardView {
    #[serde(flatten)]
    stats: AdminStats,
    flashes: Vec<Flash>,
}

#[derive(Serialize)]
struct LogsView {
    logs: String,
}

async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Flashes(flashes): Flashes,
) -> ApiResult<Response> {
    let email = current.user.email.as_str();
    let stats = state
        .admin_service
        .stats(&current.user)
        .map_err(audited(&state.audit_log, email, "load admin dashboard"))?;
    Ok(page(StatusCode::OK, AdminDashboardView { stats, flashes }))
}

async fn view_logs(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Response> {
    let email = current.user.email.as_str();
    let logs = state
        .admin_service
        .view_logs(&current.user)
        .map_err(audited(&state.audit_log, email, "view logs"))?;
    Ok(page(StatusCode::OK, LogsView { logs }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/logs", get(view_logs))
}
