use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use smartbudget_core::Error as CoreError;

use super::dashboard::{EntryRow, EntrySubmission};
use super::page;
use crate::{
    auth::CurrentUser,
    error::{audited, ApiError, ApiResult},
    flash::{self, Flash, Flashes},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditView {
    entry: EntryRow,
    categories: Vec<String>,
    csrf_token: String,
    flashes: Vec<Flash>,
}

#[derive(Debug, Default, Deserialize)]
struct DeleteSubmission {
    #[serde(default)]
    csrf_token: String,
}

/// Someone else's entry sends the user back to the dashboard with a notice
/// instead of a 403 page.
fn not_yours(err: ApiError, message: &str) -> ApiResult<Response> {
    match err {
        ApiError::Core(CoreError::Forbidden(_)) => {
            Ok(flash::redirect("/dashboard", Flash::danger(message)))
        }
        other => Err(other),
    }
}

const NOT_AUTHORIZED_EDIT: &str = "You are not authorized to edit this entry.";
const NOT_AUTHORIZED_DELETE: &str = "You are not authorized to delete this entry.";

async fn edit_page(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Flashes(flashes): Flashes,
    Path(entry_id): Path<i32>,
) -> ApiResult<Response> {
    let email = current.user.email.clone();
    let entry = match state
        .entry_service
        .get_owned_entry(current.user.id, entry_id)
        .map_err(audited(&state.audit_log, &email, "open entry"))
    {
        Ok(entry) => entry,
        Err(e) => return not_yours(e, NOT_AUTHORIZED_EDIT),
    };
    let categories = state
        .category_service
        .category_names(current.user.id)
        .map_err(audited(&state.audit_log, &email, "open entry"))?;

    Ok(page(
        StatusCode::OK,
        EditView {
            entry: EntryRow::from(&entry),
            categories,
            csrf_token: current.session.csrf_token,
            flashes,
        },
    ))
}

async fn edit_entry(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(entry_id): Path<i32>,
    Form(submission): Form<EntrySubmission>,
) -> ApiResult<Response> {
    current.verify_csrf(&submission.csrf_token)?;
    let email = current.user.email.clone();

    let result = state
        .entry_service
        .edit_entry(current.user.id, entry_id, submission.into_form())
        .await
        .map_err(audited(&state.audit_log, &email, "edit entry"));
    let entry = match result {
        Ok(entry) => entry,
        Err(e) => return not_yours(e, NOT_AUTHORIZED_EDIT),
    };

    state
        .audit_log
        .record_or_log(&format!("{} edited entry #{}", email, entry.id));
    Ok(flash::redirect(
        "/dashboard",
        Flash::success("Entry updated successfully."),
    ))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(entry_id): Path<i32>,
    Form(submission): Form<DeleteSubmission>,
) -> ApiResult<Response> {
    current.verify_csrf(&submission.csrf_token)?;
    let email = current.user.email.clone();

    let result = state
        .entry_service
        .delete_entry(current.user.id, entry_id)
        .await
        .map_err(audited(&state.audit_log, &email, "delete entry"));
    if let Err(e) = result {
        return not_yours(e, NOT_AUTHORIZED_DELETE);
    }

    state
        .audit_log
        .record_or_log(&format!("{} deleted entry #{}", email, entry_id));
    Ok(flash::redirect(
        "/dashboard",
        Flash::success("Entry deleted successfully."),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/edit/{id}", get(edit_page).post(edit_entry))
        .route("/delete/{id}", post(delete_entry))
}
