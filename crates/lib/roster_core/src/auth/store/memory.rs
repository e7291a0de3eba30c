//! In-process user store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{UserStore, UserStoreTx, normalize_email};
use crate::auth::password::{BCRYPT_COST, hash_password_blocking};
use crate::auth::{AuthError, UserCreationError};
use crate::models::auth::{NewUser, UserRecord};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, UserRecord>,
    /// Committed usernames plus those held by open units of work.
    taken: HashSet<String>,
}

/// User store kept in memory; contents are lost on restart.
#[derive(Debug, Clone)]
pub struct MemoryUserStore {
    state: Arc<Mutex<State>>,
    cost: u32,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::with_cost(BCRYPT_COST)
    }

    /// Use a specific bcrypt cost (tests use `bcrypt`'s minimum of 4).
    pub fn with_cost(cost: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            cost,
        }
    }

    /// Number of committed users.
    pub fn len(&self) -> usize {
        lock(&self.state).users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreTx>, UserCreationError> {
        Ok(Box::new(MemoryUserTx {
            state: Arc::clone(&self.state),
            cost: self.cost,
            pending: Vec::new(),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
        Ok(lock(&self.state).users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(lock(&self.state)
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// Unit of work against a [`MemoryUserStore`].
struct MemoryUserTx {
    state: Arc<Mutex<State>>,
    cost: u32,
    pending: Vec<UserRecord>,
}

#[async_trait]
impl UserStoreTx for MemoryUserTx {
    async fn create_user(&mut self, new_user: NewUser) -> Result<UserRecord, UserCreationError> {
        if new_user.username.is_empty() {
            return Err(UserCreationError::MissingUsername);
        }
        let password_hash = hash_password_blocking(new_user.password, self.cost).await?;

        let reserved = lock(&self.state).taken.insert(new_user.username.clone());
        if !reserved {
            return Err(UserCreationError::DuplicateUsername(new_user.username));
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: normalize_email(&new_user.email),
            password_hash,
            created_at: Utc::now(),
        };
        self.pending.push(user.clone());
        Ok(user)
    }

    async fn commit(self: Box<Self>) -> Result<(), UserCreationError> {
        let mut this = self;
        let pending = std::mem::take(&mut this.pending);
        let mut state = lock(&this.state);
        for user in pending {
            state.users.insert(user.id, user);
        }
        Ok(())
    }
}

impl Drop for MemoryUserTx {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut state = lock(&self.state);
        for user in &self.pending {
            state.taken.remove(&user.username);
        }
    }
}
