//! Database models for users.

use diesel::prelude::*;
use smartbudget_core::users::{NewUser, User, UserSummary};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            password_hash: db.password_hash,
            // Anything but a known role string is treated as a plain user
            role: db.role.parse().unwrap_or_default(),
        }
    }
}

impl From<UserDB> for UserSummary {
    fn from(db: UserDB) -> Self {
        UserSummary::from(&User::from(db))
    }
}

impl From<NewUser> for NewUserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            email: domain.email,
            password_hash: domain.password_hash,
            role: domain.role.as_str().to_string(),
        }
    }
}
