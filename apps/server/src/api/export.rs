use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use smartbudget_core::{
    entries::EntryFilters,
    export::{export_csv, export_json, CSV_FILENAME},
};

use crate::{
    auth::CurrentUser,
    error::{audited, ApiResult},
    main_lib::AppState,
};

async fn download_csv(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Response> {
    let email = &current.user.email;
    let entries = state
        .entry_service
        .list_entries(current.user.id, &EntryFilters::default())
        .map_err(audited(&state.audit_log, email, "download CSV"))?;
    let body = export_csv(&entries).map_err(audited(&state.audit_log, email, "download CSV"))?;

    state
        .audit_log
        .record_or_log(&format!("{} downloaded budget CSV", email));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", CSV_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}

async fn download_json(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Response> {
    let email = &current.user.email;
    let entries = state
        .entry_service
        .list_entries(current.user.id, &EntryFilters::default())
        .map_err(audited(&state.audit_log, email, "download JSON"))?;

    state
        .audit_log
        .record_or_log(&format!("{} downloaded JSON data", email));
    Ok(Json(export_json(&entries)).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/download_csv", get(download_csv))
        .route("/download_json", get(download_json))
}
