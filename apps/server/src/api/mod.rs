use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, flash, main_lib::AppState};

mod account;
mod admin;
mod auth;
mod dashboard;
mod entries;
mod export;
mod health;

const RATE_LIMITED: &str = "Too many requests. Please try again later.";

/// JSON view of a page. Rendering consumes any pending flash messages.
pub(crate) fn page<T: Serialize>(status: StatusCode, view: T) -> Response {
    let mut response = (status, Json(view)).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, flash::clear_header());
    response
}

/// Replaces the limiter's plain-text 429 with the login page variant or a
/// JSON body, depending on where the request was going.
async fn rate_limit_response(request: Request, next: Next) -> Response {
    let on_login = request.uri().path() == "/login";
    let response = next.run(request).await;
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let retry_after = response.headers().get(header::RETRY_AFTER).cloned();
    let mut replaced = if on_login {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "page": "rate_limited",
                "title": "Too Many Requests",
                "message": RATE_LIMITED,
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": RATE_LIMITED })),
        )
            .into_response()
    };
    if let Some(value) = retry_after {
        replaced.headers_mut().insert(header::RETRY_AFTER, value);
    }
    replaced
}

fn credential_routes(config: &Config) -> Router<Arc<AppState>> {
    let routes = auth::credentials_router();
    if !config.rate_limit.enabled {
        return routes;
    }

    match GovernorConfigBuilder::default()
        .period(config.rate_limit.replenish_interval)
        .burst_size(config.rate_limit.burst)
        .finish()
    {
        Some(governor) => routes
            .layer(GovernorLayer::new(Arc::new(governor)))
            .layer(middleware::from_fn(rate_limit_response)),
        None => {
            tracing::warn!("Invalid rate limit settings; login and registration are not limited");
            routes
        }
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .merge(credential_routes(config))
        .merge(auth::router())
        .merge(health::router())
        .merge(dashboard::router())
        .merge(entries::router())
        .merge(export::router())
        .merge(account::router())
        .merge(admin::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
}
