use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use smartbudget_core::users::{NewUser, Role, User, UserRepositoryTrait};
use smartbudget_core::Result;

use super::model::{NewUserDB, UserDB};
use crate::categories::NewCategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{budget_entries, categories, sessions, users};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_user(&self, user_id: i32) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    async fn create_user_with_categories(
        &self,
        new_user: NewUser,
        category_names: Vec<String>,
    ) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let user_db = diesel::insert_into(users::table)
                    .values(NewUserDB::from(new_user))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let rows: Vec<NewCategoryDB> = category_names
                    .into_iter()
                    .map(|name| NewCategoryDB {
                        user_id: user_db.id,
                        name,
                    })
                    .collect();
                if !rows.is_empty() {
                    diesel::insert_into(categories::table)
                        .values(&rows)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                debug!("Created user {} with {} categories", user_db.id, rows.len());
                Ok(User::from(user_db))
            })
            .await
    }

    async fn update_role(&self, email: String, role: Role) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(users::table.filter(users::email.eq(email)))
                    .set(users::role.eq(role.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn delete_user_cascade(&self, user_id: i32) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(budget_entries::table.filter(budget_entries::user_id.eq(user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(categories::table.filter(categories::user_id.eq(user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use smartbudget_core::errors::{DatabaseError, Error};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
        }
    }

    fn defaults() -> Vec<String> {
        vec!["Food".to_string(), "Rent".to_string()]
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (pool, writer, _dir) = setup_db();
        let repo = UserRepository::new(pool.clone(), writer);

        let user = repo
            .create_user_with_categories(new_user("a@x.com"), defaults())
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let found = repo.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(repo.get_user(user.id).unwrap().unwrap().email, "a@x.com");
        assert!(repo.find_by_email("nobody@x.com").unwrap().is_none());

        let mut conn = get_connection(&pool).unwrap();
        let names: Vec<String> = categories::table
            .filter(categories::user_id.eq(user.id))
            .select(categories::name)
            .order(categories::name.asc())
            .load(&mut conn)
            .unwrap();
        assert_eq!(names, vec!["Food", "Rent"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation_and_rolls_back() {
        let (pool, writer, _dir) = setup_db();
        let repo = UserRepository::new(pool.clone(), writer);

        repo.create_user_with_categories(new_user("a@x.com"), defaults())
            .await
            .unwrap();
        let err = repo
            .create_user_with_categories(new_user("a@x.com"), defaults())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));

        let mut conn = get_connection(&pool).unwrap();
        let count: i64 = categories::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_update_role() {
        let (pool, writer, _dir) = setup_db();
        let repo = UserRepository::new(pool, writer);
        repo.create_user_with_categories(new_user("boss@x.com"), vec![])
            .await
            .unwrap();

        assert_eq!(
            repo.update_role("boss@x.com".to_string(), Role::Admin)
                .await
                .unwrap(),
            1
        );
        assert!(repo.find_by_email("boss@x.com").unwrap().unwrap().is_admin());
        assert_eq!(
            repo.update_role("ghost@x.com".to_string(), Role::Admin)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_delete_user_cascade_leaves_other_users_alone() {
        let (pool, writer, _dir) = setup_db();
        let repo = UserRepository::new(pool.clone(), writer);
        let gone = repo
            .create_user_with_categories(new_user("gone@x.com"), defaults())
            .await
            .unwrap();
        let kept = repo
            .create_user_with_categories(new_user("kept@x.com"), defaults())
            .await
            .unwrap();

        repo.delete_user_cascade(gone.id).await.unwrap();

        assert!(repo.get_user(gone.id).unwrap().is_none());
        assert!(repo.get_user(kept.id).unwrap().is_some());
        let mut conn = get_connection(&pool).unwrap();
        let remaining: Vec<i32> = categories::table
            .select(categories::user_id)
            .load(&mut conn)
            .unwrap();
        assert!(remaining.iter().all(|id| *id == kept.id));
        assert_eq!(remaining.len(), 2);
    }
}
