use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::Response,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use smartbudget_core::Error as CoreError;

use crate::{
    auth::CurrentUser,
    error::{audited, ApiResult},
    flash::{self, Flash},
    main_lib::AppState,
};

#[derive(Debug, Default, Deserialize)]
struct DeleteAccountSubmission {
    csrf_token: Option<String>,
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Form(submission): Form<DeleteAccountSubmission>,
) -> ApiResult<Response> {
    let email = current.user.email.clone();
    let result = state
        .auth_service
        .delete_account(
            &current.user,
            &current.session,
            submission.csrf_token.as_deref(),
        )
        .await;

    match result {
        Ok(()) => {}
        Err(CoreError::Validation(e)) => {
            tracing::warn!("Account deletion rejected for {}: {}", email, e);
            return Ok(flash::redirect(
                "/dashboard",
                Flash::danger("Invalid CSRF token or form submission."),
            ));
        }
        Err(e) => return Err(audited(&state.audit_log, &email, "delete account")(e)),
    }

    state
        .audit_log
        .record_or_log(&format!("{} deleted their account", email));

    let mut response = flash::redirect(
        "/login",
        Flash::info("Your account and data have been deleted."),
    );
    response
        .headers_mut()
        .append(header::SET_COOKIE, state.sessions.clear_session_cookie());
    Ok(response)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/delete_account", post(delete_account))
}
