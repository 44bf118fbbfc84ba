use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use smartbudget_core::auth::{tokens::tokens_match, Session};
use smartbudget_core::users::User;

use crate::cookies::{clear_cookie, cookie_value, set_cookie};
use crate::error::{audited, ApiError};
use crate::main_lib::AppState;

pub const SESSION_COOKIE: &str = "sb_session";

/// Signs and verifies the session cookie. The cookie is an HS256 JWT whose
/// only job is to carry the server-side session id tamper-proof.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    secure_cookie: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    sid: String,
    iat: usize,
    exp: usize,
}

/// Identity carried by a valid session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: i32,
    pub session_id: String,
}

impl SessionManager {
    pub fn new(secret: &[u8], ttl: Duration, secure_cookie: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            secure_cookie,
        }
    }

    pub fn issue_token(&self, session: &Session) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.ttl;
        let claims = Claims {
            sub: session.user_id.to_string(),
            sid: session.id.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign session token: {e}")))
    }

    /// `None` for anything that is not a live token we signed.
    pub fn validate_token(&self, token: &str) -> Option<SessionClaims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        Some(SessionClaims {
            user_id: data.claims.sub.parse().ok()?,
            session_id: data.claims.sid,
        })
    }

    pub fn session_cookie(&self, token: &str) -> Result<HeaderValue, ApiError> {
        set_cookie(SESSION_COOKIE, token, Some(self.ttl), self.secure_cookie)
            .ok_or_else(|| ApiError::Internal("Session token is not a valid cookie value".into()))
    }

    pub fn clear_session_cookie(&self) -> HeaderValue {
        clear_cookie(SESSION_COOKIE, self.secure_cookie)
    }
}

/// Accepts base64 for 32 bytes, or a raw 32-character ASCII string.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Secret key cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => bytes,
        _ if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Ok(_) => anyhow::bail!("Secret key must decode to exactly 32 bytes"),
        Err(_) => {
            anyhow::bail!("Secret key must be base64 encoded or a 32-byte ASCII string")
        }
    };

    Ok(decoded)
}

pub fn random_secret_key() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// The logged-in user of this request. Rejects with a redirect to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl CurrentUser {
    /// Compares a submitted form token with the session's CSRF token.
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), ApiError> {
        if submitted.is_empty() {
            return Err(ApiError::Csrf("The CSRF token is missing.".into()));
        }
        if !tokens_match(&self.session.csrf_token, submitted) {
            return Err(ApiError::Csrf("The CSRF tokens do not match.".into()));
        }
        Ok(())
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token =
            cookie_value(&parts.headers, SESSION_COOKIE).ok_or(ApiError::Unauthenticated)?;
        let claims = state
            .sessions
            .validate_token(&token)
            .ok_or(ApiError::Unauthenticated)?;

        let (user, session) = state
            .auth_service
            .resolve_session(&claims.session_id)
            .await
            .map_err(|e| match e {
                smartbudget_core::Error::Auth(_) => ApiError::Unauthenticated,
                other => {
                    let actor = format!("user #{}", claims.user_id);
                    audited(&state.audit_log, &actor, "resolve session")(other)
                }
            })?;

        if user.id != claims.user_id {
            tracing::warn!("Session {} does not belong to cookie subject", session.id);
            return Err(ApiError::Unauthenticated);
        }

        Ok(CurrentUser { user, session })
    }
}
