use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence.
///
/// `insert` and `update` split insert-or-update along the type system: a
/// [`NewUser`] has no id yet, a [`User`] always does, so "insert if the id is
/// unset" holds by construction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; storage assigns the id and creation timestamp.
    async fn insert(&self, user: NewUser) -> UserResult<User>;

    /// Overwrite an existing user, matched by id.
    async fn update(&self, user: User) -> UserResult<User>;

    /// Get a user by id.
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Every persisted user, in id (= insertion) order.
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Check whether an email is already taken.
    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    /// Check whether a user with this id exists.
    async fn exists_by_id(&self, id: i64) -> UserResult<bool>;

    /// Remove a user permanently. Returns false when the id was absent.
    async fn delete_by_id(&self, id: i64) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        // Ids are monotonic and never reused, even after deletes.
        store.next_id += 1;
        let user = User {
            id: store.next_id,
            name: user.name,
            email: user.email,
            password: user.password,
            role: user.role,
            active: user.active,
            created_at: Utc::now(),
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        // BTreeMap iterates in ascending id order, which is insertion order
        // because ids are assigned monotonically.
        Ok(store.users.values().cloned().collect())
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.users.values().any(|u| u.email == email))
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.users.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let mut store = self.store.write().await;

        if store.users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
