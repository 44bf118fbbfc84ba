use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use smartbudget_core::audit::AuditLog;
use smartbudget_core::errors::{Error as CoreError, FieldErrors};
use thiserror::Error;

use crate::auth::SESSION_COOKIE;
use crate::cookies::clear_cookie;
use crate::flash::{self, Flash};

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";
const FORBIDDEN: &str = "You do not have permission to access this page.";
const INTERNAL: &str = "Something went wrong. Please try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Login required")]
    Unauthenticated,
    #[error("{0}")]
    Csrf(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        message: message.into(),
        errors: None,
        reason: None,
    };
    (status, Json(body)).into_response()
}

fn internal_error(detail: &str) -> Response {
    tracing::error!("Request failed: {}", detail);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Core(CoreError::Validation(e)) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = ErrorBody {
                    code: status.as_u16(),
                    message: "Please correct the errors below.".to_string(),
                    errors: Some(e.field_errors().cloned().unwrap_or_else(|| {
                        let mut errors = FieldErrors::new();
                        errors.add("form", e.to_string());
                        errors
                    })),
                    reason: None,
                };
                (status, Json(body)).into_response()
            }
            ApiError::Core(CoreError::Auth(message)) => {
                flash::redirect("/login", Flash::danger(message))
            }
            ApiError::Core(CoreError::Forbidden(_)) => json_error(StatusCode::FORBIDDEN, FORBIDDEN),
            ApiError::Core(CoreError::NotFound(message)) => {
                json_error(StatusCode::NOT_FOUND, message)
            }
            ApiError::Core(e @ (CoreError::Database(_) | CoreError::Unexpected(_))) => {
                internal_error(&e.to_string())
            }
            ApiError::Unauthenticated => {
                let mut response = flash::redirect("/login", Flash::info(LOGIN_REQUIRED));
                response
                    .headers_mut()
                    .append(header::SET_COOKIE, clear_cookie(SESSION_COOKIE, false));
                response
            }
            ApiError::Csrf(reason) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ErrorBody {
                    code: status.as_u16(),
                    message: "Invalid CSRF token or form submission.".to_string(),
                    errors: None,
                    reason: Some(reason),
                };
                (status, Json(body)).into_response()
            }
            ApiError::Internal(detail) => internal_error(&detail),
            ApiError::Anyhow(e) => internal_error(&e.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Writes server-side failures to the audit log with who did what. Client
/// errors (validation, auth, ownership) pass through untouched.
pub fn audited<'a>(
    audit_log: &'a AuditLog,
    actor: &str,
    action: &str,
) -> impl FnOnce(CoreError) -> ApiError + 'a {
    let actor = actor.to_string();
    let action = action.to_string();
    move |err| {
        if matches!(err, CoreError::Database(_) | CoreError::Unexpected(_)) {
            audit_log.record_or_log(&format!("[ERROR] {action} by {actor} failed: {err}"));
        }
        ApiError::Core(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartbudget_core::errors::{DatabaseError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Core(ValidationError::field("email", "bad").into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Core(CoreError::Forbidden("admin role required".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::Core(CoreError::NotFound("Entry 9".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Core(CoreError::Database(DatabaseError::QueryFailed("boom".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Csrf("missing".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthenticated, StatusCode::SEE_OTHER),
            (
                ApiError::Core(CoreError::Auth("nope".into())),
                StatusCode::SEE_OTHER,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_audited_records_only_server_failures() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path().join("audit.log"));

        let _ = audited(&audit, "a@x.com", "add entry")(CoreError::NotFound("x".into()));
        assert!(audit.read_all().unwrap().is_none());

        let _ = audited(&audit, "a@x.com", "add entry")(CoreError::Unexpected("disk".into()));
        let text = audit.read_all().unwrap().unwrap();
        assert!(text.contains("[ERROR] add entry by a@x.com failed"));
    }
}
