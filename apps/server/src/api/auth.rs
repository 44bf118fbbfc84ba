use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Serialize;
use smartbudget_core::{
    auth::{Credentials, Registration},
    users::Role,
    Error as CoreError,
};

use super::page;
use crate::{
    auth::CurrentUser,
    error::{audited, ApiError, ApiResult},
    flash::{self, Flash, Flashes},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormView {
    page: &'static str,
    fields: &'static [&'static str],
    flashes: Vec<Flash>,
}

async fn home() -> Redirect {
    Redirect::to("/login")
}

async fn register_page(Flashes(flashes): Flashes) -> Response {
    page(
        StatusCode::OK,
        FormView {
            page: "register",
            fields: &["email", "password", "confirm_password"],
            flashes,
        },
    )
}

async fn register(
    State(state): State<Arc<AppState>>,
    Form(registration): Form<Registration>,
) -> ApiResult<Response> {
    let email = registration.email.trim().to_string();
    let user = match state.auth_service.register(registration).await {
        Ok(user) => user,
        Err(CoreError::Validation(e)) => {
            tracing::warn!("Registration rejected: {}", e);
            state
                .audit_log
                .record_or_log(&format!("[REGISTER] Failed: {e}"));
            return Err(ApiError::Core(CoreError::Validation(e)));
        }
        Err(e) => return Err(audited(&state.audit_log, &email, "register")(e)),
    };

    if state.is_admin_email(&user.email) {
        state
            .auth_service
            .set_role(&user.email, Role::Admin)
            .await
            .map_err(audited(&state.audit_log, &email, "grant admin"))?;
        tracing::info!("Granted admin role to {}", user.email);
    }

    state.audit_log.record_or_log(&format!(
        "[REGISTER] New user created: {} (ID: {})",
        user.email, user.id
    ));
    Ok(flash::redirect("/login", Flash::success("Account created!")))
}

async fn login_page(Flashes(flashes): Flashes) -> Response {
    page(
        StatusCode::OK,
        FormView {
            page: "login",
            fields: &["email", "password"],
            flashes,
        },
    )
}

async fn login(
    State(state): State<Arc<AppState>>,
    Form(credentials): Form<Credentials>,
) -> ApiResult<Response> {
    let email = credentials.email.trim().to_string();
    let (user, session) = match state.auth_service.login(credentials).await {
        Ok(found) => found,
        Err(CoreError::Auth(message)) => {
            tracing::warn!("Login failed for {}", email);
            state
                .audit_log
                .record_or_log(&format!("[LOGIN] FAILED for {email}"));
            return Ok(flash::redirect("/login", Flash::danger(message)));
        }
        Err(e) => return Err(audited(&state.audit_log, &email, "login")(e)),
    };

    let cookie = state
        .sessions
        .issue_token(&session)
        .and_then(|token| state.sessions.session_cookie(&token))
        .inspect_err(|e| {
            state
                .audit_log
                .record_or_log(&format!("[ERROR] login by {email} failed: {e}"));
        })?;
    state
        .audit_log
        .record_or_log(&format!("[LOGIN] SUCCESS for {}", user.email));

    let mut response = Redirect::to("/dashboard").into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    response
        .headers_mut()
        .append(header::SET_COOKIE, flash::clear_header());
    Ok(response)
}

async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Response> {
    state
        .auth_service
        .logout(&current.session.id)
        .await
        .map_err(audited(&state.audit_log, &current.user.email, "logout"))?;
    state
        .audit_log
        .record_or_log(&format!("User {} logged out", current.user.email));

    let mut response = flash::redirect("/login", Flash::info("Logged out successfully."));
    response
        .headers_mut()
        .append(header::SET_COOKIE, state.sessions.clear_session_cookie());
    Ok(response)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/home", get(home))
        .route("/logout", get(logout))
}

/// Endpoints that accept credentials; these sit behind the rate limiter.
pub fn credentials_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
}
