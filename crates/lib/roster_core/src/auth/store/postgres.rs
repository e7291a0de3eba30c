//! PostgreSQL user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{UserStore, UserStoreTx, normalize_email};
use crate::auth::password::{BCRYPT_COST, hash_password_blocking};
use crate::auth::{AuthError, UserCreationError};
use crate::models::auth::{NewUser, UserRecord};

type UserRow = (Uuid, String, String, String, DateTime<Utc>);

fn into_record((id, username, email, password_hash, created_at): UserRow) -> UserRecord {
    UserRecord {
        id,
        username,
        email,
        password_hash,
        created_at,
    }
}

/// User store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
    cost: u32,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_cost(pool, BCRYPT_COST)
    }

    pub fn with_cost(pool: PgPool, cost: u32) -> Self {
        Self { pool, cost }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreTx>, UserCreationError> {
        Ok(Box::new(PgUserTx {
            pool: self.pool.clone(),
            tx: None,
            cost: self.cost,
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }
}

/// One SQL transaction, opened on the first insert and rolled back on drop
/// unless committed.
struct PgUserTx {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
    cost: u32,
}

#[async_trait]
impl UserStoreTx for PgUserTx {
    async fn create_user(&mut self, new_user: NewUser) -> Result<UserRecord, UserCreationError> {
        if new_user.username.is_empty() {
            return Err(UserCreationError::MissingUsername);
        }
        let password_hash = hash_password_blocking(new_user.password, self.cost).await?;

        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        let tx = self.tx.insert(tx);

        // Concurrent inserts of one username serialize on the unique index.
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(&new_user.username)
        .bind(normalize_email(&new_user.email))
        .bind(&password_hash)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                UserCreationError::DuplicateUsername(new_user.username.clone())
            }
            other => UserCreationError::DbError(other),
        })?;
        Ok(into_record(row))
    }

    async fn commit(self: Box<Self>) -> Result<(), UserCreationError> {
        if let PgUserTx { tx: Some(tx), .. } = *self {
            tx.commit().await?;
        }
        Ok(())
    }
}
