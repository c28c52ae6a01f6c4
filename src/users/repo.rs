use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::users::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already held by another user.
    #[error("username already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Number of users whose username matches exactly (case-sensitive).
    async fn count_by_username(&self, username: &str) -> Result<i64, StoreError>;

    /// Persist `user` and return it with its assigned id.
    /// Fails with `DuplicateUsername` when the username is taken, in which case nothing is written.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn count_by_username(&self, username: &str) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
              FROM users
             WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await
        .context("count users by username")?;
        Ok(count)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, performance)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, performance
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(Json(&user.performance))
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername
            } else {
                StoreError::Backend(anyhow::Error::new(e).context("insert user"))
            }
        })
    }
}
