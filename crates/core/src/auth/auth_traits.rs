use crate::auth::auth_model::{Credentials, NewSession, Registration, Session};
use crate::errors::Result;
use crate::users::{Role, User};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepositoryTrait: Send + Sync {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>>;
    async fn create_session(&self, new_session: NewSession) -> Result<Session>;
    async fn delete_session(&self, session_id: String) -> Result<usize>;
    /// Removes every session whose expiry is at or before `now`.
    async fn delete_expired_sessions(&self, now: NaiveDateTime) -> Result<usize>;
}

/// Trait for auth service operations
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<User>;
    async fn login(&self, credentials: Credentials) -> Result<(User, Session)>;
    async fn logout(&self, session_id: &str) -> Result<()>;

    /// Drops sessions that expired without a logout.
    async fn purge_expired_sessions(&self) -> Result<usize>;

    /// Looks up a live session and its user. Expired sessions are removed.
    async fn resolve_session(&self, session_id: &str) -> Result<(User, Session)>;

    /// Deletes the account when `confirmation` matches the session's CSRF token.
    async fn delete_account(
        &self,
        user: &User,
        session: &Session,
        confirmation: Option<&str>,
    ) -> Result<()>;

    /// Grants `role` to the user with this email. Returns false if no such user.
    async fn set_role(&self, email: &str, role: Role) -> Result<bool>;
}
