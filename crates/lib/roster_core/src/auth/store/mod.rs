//! User store collaborators.
//!
//! A store hands out units of work ([`UserStoreTx`]). Accounts created inside
//! a unit of work become visible only after [`UserStoreTx::commit`]; dropping
//! an uncommitted unit discards them and frees their usernames.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthError, UserCreationError};
use crate::models::auth::{NewUser, UserRecord};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Persists user accounts and enforces username uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn UserStoreTx>, UserCreationError>;

    /// Fetch a committed user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError>;

    /// Fetch a committed user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;
}

/// One unit of work against a [`UserStore`].
#[async_trait]
pub trait UserStoreTx: Send {
    /// Create a user: rejects empty or taken usernames, hashes the password,
    /// normalizes the email and assigns an ID. The password is hashed before
    /// the store is touched.
    async fn create_user(&mut self, new_user: NewUser) -> Result<UserRecord, UserCreationError>;

    /// Make every account created in this unit of work durable.
    async fn commit(self: Box<Self>) -> Result<(), UserCreationError>;
}

/// Lower-case the domain part of an email address, leaving the local part as is.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
