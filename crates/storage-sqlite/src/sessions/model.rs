use chrono::NaiveDateTime;
use diesel::prelude::*;
use smartbudget_core::auth::{NewSession, Session};

#[derive(Queryable, Insertable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionDB {
    pub id: String,
    pub user_id: i32,
    pub csrf_token: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl From<SessionDB> for Session {
    fn from(db: SessionDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            csrf_token: db.csrf_token,
            created_at: db.created_at,
            expires_at: db.expires_at,
        }
    }
}

impl From<NewSession> for SessionDB {
    fn from(domain: NewSession) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            csrf_token: domain.csrf_token,
            created_at: domain.created_at,
            expires_at: domain.expires_at,
        }
    }
}
