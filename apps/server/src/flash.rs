//! One-shot messages carried across a redirect in the `sb_flash` cookie.
//!
//! The cookie holds base64url JSON: `[{"category": "...", "message": "..."}]`.
//! It is written on redirect and cleared by the next rendered view.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::cookies::{clear_cookie, cookie_value, set_cookie};

pub const FLASH_COOKIE: &str = "sb_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }
}

pub fn encode(flashes: &[Flash]) -> String {
    let json = serde_json::to_vec(flashes).unwrap_or_else(|_| b"[]".to_vec());
    URL_SAFE_NO_PAD.encode(json)
}

/// Malformed or tampered cookies decode to nothing.
pub fn decode(raw: &str) -> Vec<Flash> {
    URL_SAFE_NO_PAD
        .decode(raw.trim())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Pending messages of the current request.
#[derive(Debug, Clone, Default)]
pub struct Flashes(pub Vec<Flash>);

impl Flashes {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Flashes(cookie_value(headers, FLASH_COOKIE).map(|v| decode(&v)).unwrap_or_default())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Flashes {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flashes::from_headers(&parts.headers))
    }
}

/// `Set-Cookie` value that drops any pending messages.
pub fn clear_header() -> HeaderValue {
    clear_cookie(FLASH_COOKIE, false)
}

/// 303 to `location` carrying `flashes` for the next page.
pub fn redirect_with(location: &str, flashes: &[Flash]) -> Response {
    let mut response = Redirect::to(location).into_response();
    if let Some(value) = set_cookie(FLASH_COOKIE, &encode(flashes), None, false) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

pub fn redirect(location: &str, flash: Flash) -> Response {
    redirect_with(location, &[flash])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_payload_round_trips() {
        let flashes = vec![
            Flash::success("Account created!"),
            Flash::danger("Login failed. Please check your email or password."),
        ];
        let encoded = encode(&flashes);
        assert!(!encoded.contains(';'));
        assert!(!encoded.contains('='));
        assert_eq!(decode(&encoded), flashes);
    }

    #[test]
    fn test_garbage_decodes_to_empty() {
        assert!(decode("not base64 !!").is_empty());
        assert!(decode(&URL_SAFE_NO_PAD.encode("{\"not\":\"a list\"}")).is_empty());
    }

    #[test]
    fn test_redirect_sets_cookie_and_location() {
        let response = redirect("/login", Flash::info("Logged out successfully."));
        assert_eq!(response.status(), 303);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("sb_flash="));
    }
}
