use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use super::auth_model::{Credentials, NewSession, Registration, Session};
use super::auth_traits::{AuthServiceTrait, SessionRepositoryTrait};
use super::password::{hash_password, verify_password};
use super::tokens::{generate_token, tokens_match};
use crate::constants::DEFAULT_CATEGORIES;
use crate::errors::{DatabaseError, Error, FieldErrors, Result, ValidationError};
use crate::users::{NewUser, Role, User, UserRepositoryTrait};

lazy_static! {
    /// local@domain.tld, no whitespace, exactly one '@'
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("Invalid regex pattern");
}

const LOGIN_FAILED: &str = "Login failed. Please check your email or password.";
const REQUIRED: &str = "This field is required.";

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Role gate: plain string equality on the stored role.
pub fn require_role(user: &User, role: Role) -> Result<()> {
    if user.role.as_str() == role.as_str() {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "{} role required",
            role.as_str()
        )))
    }
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    session_repository: Arc<dyn SessionRepositoryTrait>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        session_repository: Arc<dyn SessionRepositoryTrait>,
        session_ttl: Duration,
    ) -> Self {
        AuthService {
            user_repository,
            session_repository,
            session_ttl,
        }
    }

    fn validate_registration(&self, registration: &Registration) -> Result<()> {
        let mut errors = FieldErrors::new();
        let email = registration.email.trim();

        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !validate_email(email) {
            errors.add("email", "Invalid email address.");
        } else if self.user_repository.find_by_email(email)?.is_some() {
            errors.add("email", "That email is already registered.");
        }

        if registration.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        if registration.confirm_password.is_empty() {
            errors.add("confirm_password", REQUIRED);
        } else if registration.confirm_password != registration.password {
            errors.add("confirm_password", "Field must be equal to password.");
        }

        errors.into_result().map_err(Error::from)
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(&self, registration: Registration) -> Result<User> {
        self.validate_registration(&registration)?;

        let new_user = NewUser {
            email: registration.email.trim().to_string(),
            password_hash: hash_password(&registration.password)?,
            role: Role::User,
        };
        let categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();

        match self
            .user_repository
            .create_user_with_categories(new_user, categories)
            .await
        {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent registration of the same email
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => Err(
                ValidationError::field("email", "That email is already registered.").into(),
            ),
            Err(e) => Err(e),
        }
    }

    async fn login(&self, credentials: Credentials) -> Result<(User, Session)> {
        let email = credentials.email.trim();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(Error::Auth(LOGIN_FAILED.to_string()));
        }

        let Some(user) = self.user_repository.find_by_email(email)? else {
            debug!("Login attempt for unknown email");
            return Err(Error::Auth(LOGIN_FAILED.to_string()));
        };

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(Error::Auth(LOGIN_FAILED.to_string()));
        }

        let now = Utc::now().naive_utc();
        let purged = self
            .session_repository
            .delete_expired_sessions(now)
            .await?;
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }

        let session = self
            .session_repository
            .create_session(NewSession {
                id: generate_token(),
                user_id: user.id,
                csrf_token: generate_token(),
                created_at: now,
                expires_at: now + self.session_ttl,
            })
            .await?;

        Ok((user, session))
    }

    async fn logout(&self, session_id: &str) -> Result<()> {
        self.session_repository
            .delete_session(session_id.to_string())
            .await?;
        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<usize> {
        self.session_repository
            .delete_expired_sessions(Utc::now().naive_utc())
            .await
    }

    async fn resolve_session(&self, session_id: &str) -> Result<(User, Session)> {
        let unauthenticated = || Error::Auth("Please log in to access this page.".to_string());

        let session = self
            .session_repository
            .get_session(session_id)?
            .ok_or_else(unauthenticated)?;

        if session.is_expired(Utc::now().naive_utc()) {
            self.session_repository
                .delete_session(session.id.clone())
                .await?;
            return Err(unauthenticated());
        }

        let user = self
            .user_repository
            .get_user(session.user_id)?
            .ok_or_else(unauthenticated)?;

        Ok((user, session))
    }

    async fn delete_account(
        &self,
        user: &User,
        session: &Session,
        confirmation: Option<&str>,
    ) -> Result<()> {
        let confirmed = confirmation
            .map(|token| tokens_match(&session.csrf_token, token))
            .unwrap_or(false);
        if !confirmed || session.user_id != user.id {
            warn!("Account deletion rejected for user {}", user.id);
            return Err(ValidationError::field(
                "csrf_token",
                "Invalid CSRF token or form submission.",
            )
            .into());
        }

        self.user_repository.delete_user_cascade(user.id).await
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<bool> {
        let updated = self
            .user_repository
            .update_role(email.trim().to_string(), role)
            .await?;
        Ok(updated > 0)
    }
}
