use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Form, Router,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smartbudget_core::{
    categories::AddCategoryOutcome,
    entries::{BudgetEntry, EntryFilters, EntryForm, EntryType},
    summary::{summarize, DashboardSummary},
    Error as CoreError,
};

use super::page;
use crate::{
    auth::CurrentUser,
    error::{audited, ApiResult},
    flash::{self, Flash, Flashes},
    main_lib::AppState,
};

/// One table row. Ownership stays server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryRow {
    pub id: i32,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

impl From<&BudgetEntry> for EntryRow {
    fn from(entry: &BudgetEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            category: entry.category.clone(),
            amount: entry.amount,
            entry_type: entry.entry_type,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardView {
    entries: Vec<EntryRow>,
    #[serde(flatten)]
    summary: DashboardSummary,
    categories: Vec<String>,
    selected_category: Option<String>,
    selected_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    csrf_token: String,
    flashes: Vec<Flash>,
}

/// Entry form fields plus the CSRF token, as posted by the dashboard and
/// edit pages.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EntrySubmission {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default, rename = "type")]
    pub entry_type: String,
}

impl EntrySubmission {
    pub fn into_form(self) -> EntryForm {
        EntryForm {
            date: self.date,
            category: self.category,
            amount: self.amount,
            entry_type: self.entry_type,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct NewCategorySubmission {
    #[serde(default)]
    csrf_token: String,
    #[serde(default)]
    new_category: String,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Flashes(flashes): Flashes,
    Query(filters): Query<EntryFilters>,
) -> ApiResult<Response> {
    let user_id = current.user.id;
    let email = current.user.email.as_str();
    let entries = state
        .entry_service
        .list_entries(user_id, &filters)
        .map_err(audited(&state.audit_log, email, "load dashboard"))?;
    let categories = state
        .category_service
        .category_names(user_id)
        .map_err(audited(&state.audit_log, email, "load dashboard"))?;
    let summary = summarize(&entries, Local::now().date_naive());

    Ok(page(
        StatusCode::OK,
        DashboardView {
            entries: entries.iter().map(EntryRow::from).collect(),
            summary,
            categories,
            selected_category: filters.category,
            selected_type: filters.entry_type,
            start_date: filters.start_date,
            end_date: filters.end_date,
            csrf_token: current.session.csrf_token,
            flashes,
        },
    ))
}

async fn add_entry(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Form(submission): Form<EntrySubmission>,
) -> ApiResult<Response> {
    current.verify_csrf(&submission.csrf_token)?;
    let email = current.user.email.clone();

    let entry = state
        .entry_service
        .add_entry(current.user.id, submission.into_form())
        .await
        .map_err(audited(&state.audit_log, &email, "add entry"))?;

    state.audit_log.record_or_log(&format!(
        "{} added {}: {} - {}",
        email, entry.entry_type, entry.category, entry.amount
    ));
    Ok(flash::redirect(
        "/dashboard",
        Flash::success("Entry added successfully!"),
    ))
}

async fn add_category(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Form(submission): Form<NewCategorySubmission>,
) -> ApiResult<Response> {
    current.verify_csrf(&submission.csrf_token)?;
    let email = current.user.email.clone();

    let outcome = match state
        .category_service
        .add_category(current.user.id, &submission.new_category)
        .await
    {
        Ok(outcome) => outcome,
        Err(CoreError::Validation(e)) => {
            let message = e
                .field_errors()
                .and_then(|errors| errors.get("new_category"))
                .and_then(|messages| messages.first().cloned())
                .unwrap_or_else(|| e.to_string());
            return Ok(flash::redirect("/dashboard", Flash::danger(message)));
        }
        Err(e) => return Err(audited(&state.audit_log, &email, "add category")(e)),
    };

    let flash = match outcome {
        AddCategoryOutcome::Created(category) => {
            state
                .audit_log
                .record_or_log(&format!("{} added new category: {}", email, category.name));
            Flash::success("Category added!")
        }
        AddCategoryOutcome::Exists => Flash::warning("Category already exists."),
    };
    Ok(flash::redirect("/dashboard", flash))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard).post(add_entry))
        .route("/add_category", post(add_category))
}
