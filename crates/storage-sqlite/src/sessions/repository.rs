use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;

use smartbudget_core::auth::{NewSession, Session, SessionRepositoryTrait};
use smartbudget_core::Result;

use super::model::SessionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sessions;

pub struct SessionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SessionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SessionRepository { pool, writer }
    }
}

#[async_trait]
impl SessionRepositoryTrait for SessionRepository {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let mut conn = get_connection(&self.pool)?;
        let session = sessions::table
            .find(session_id)
            .select(SessionDB::as_select())
            .first::<SessionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(session.map(Session::from))
    }

    async fn create_session(&self, new_session: NewSession) -> Result<Session> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Session> {
                let session_db = diesel::insert_into(sessions::table)
                    .values(SessionDB::from(new_session))
                    .returning(SessionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Session::from(session_db))
            })
            .await
    }

    async fn delete_session(&self, session_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(sessions::table.find(session_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn delete_expired_sessions(&self, now: NaiveDateTime) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(
                    diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use crate::users::UserRepository;
    use chrono::{Duration, NaiveDate};
    use smartbudget_core::errors::{DatabaseError, Error};
    use smartbudget_core::users::{NewUser, Role, UserRepositoryTrait};

    async fn seed_user(repo: &UserRepository) -> i32 {
        repo.create_user_with_categories(
            NewUser {
                email: "s@x.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::User,
            },
            vec![],
        )
        .await
        .unwrap()
        .id
    }

    fn new_session(id: &str, user_id: i32) -> NewSession {
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        NewSession {
            id: id.to_string(),
            user_id,
            csrf_token: "csrf".to_string(),
            created_at,
            expires_at: created_at + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (pool, writer, _dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let repo = SessionRepository::new(pool, writer);
        let user_id = seed_user(&users).await;

        let created = repo.create_session(new_session("sid-1", user_id)).await.unwrap();
        let loaded = repo.get_session("sid-1").unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.expires_at - loaded.created_at, Duration::hours(1));

        assert_eq!(repo.delete_session("sid-1".to_string()).await.unwrap(), 1);
        assert!(repo.get_session("sid-1").unwrap().is_none());
        assert_eq!(repo.delete_session("sid-1".to_string()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_expired_sessions_keeps_live_ones() {
        let (pool, writer, _dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let repo = SessionRepository::new(pool, writer);
        let user_id = seed_user(&users).await;

        let stale = repo.create_session(new_session("stale", user_id)).await.unwrap();
        let mut fresh = new_session("fresh", user_id);
        fresh.expires_at = stale.expires_at + Duration::hours(1);
        repo.create_session(fresh).await.unwrap();

        // Expiry is inclusive
        let purged = repo.delete_expired_sessions(stale.expires_at).await.unwrap();
        assert_eq!(purged, 1);
        assert!(repo.get_session("stale").unwrap().is_none());
        assert!(repo.get_session("fresh").unwrap().is_some());
        assert_eq!(
            repo.delete_expired_sessions(stale.expires_at).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_session_requires_existing_user() {
        let (pool, writer, _dir) = setup_db();
        let repo = SessionRepository::new(pool, writer);

        let err = repo.create_session(new_session("orphan", 999)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::ForeignKeyViolation(_))
        ));
    }
}
