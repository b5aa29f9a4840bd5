//! User store abstraction and the in-memory implementation.
//!
//! Usernames are unique. `insert` performs the uniqueness check and the
//! write as one atomic step, so two concurrent registrations of the same
//! name cannot both succeed.

use crate::errors::GatewayError;
use crate::models::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by username.
    async fn get(&self, username: &str) -> Result<Option<User>, GatewayError>;

    /// Insert a new user.
    ///
    /// Returns `GatewayError::DuplicateUser` if the username is taken; the
    /// existing record is left untouched.
    async fn insert(&self, user: User) -> Result<User, GatewayError>;
}

/// Process-local user store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, username: &str) -> Result<Option<User>, GatewayError> {
        let users = self.users.read().map_err(|_| {
            tracing::error!(target: "gw.repositories.users", "User store lock poisoned");
            GatewayError::Internal
        })?;
        Ok(users.get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, GatewayError> {
        let mut users = self.users.write().map_err(|_| {
            tracing::error!(target: "gw.repositories.users", "User store lock poisoned");
            GatewayError::Internal
        })?;

        if users.contains_key(&user.username) {
            return Err(GatewayError::DuplicateUser);
        }

        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{ROLE_ADMIN, ROLE_USER};
    use std::sync::Arc;

    fn user(name: &str, role: &str) -> User {
        User {
            username: name.to_string(),
            password_hash: format!("hash-of-{}", name),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemoryUserStore::new();
        assert!(store.is_empty());

        store.insert(user("alice", ROLE_USER)).await.unwrap();

        let found = store.get("alice").await.unwrap().unwrap();
        assert_eq!(found, user("alice", ROLE_USER));
        assert!(store.get("bob").await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_original() {
        let store = InMemoryUserStore::new();
        store.insert(user("admin", ROLE_ADMIN)).await.unwrap();

        let mut imposter = user("admin", ROLE_USER);
        imposter.password_hash = "other".to_string();
        let result = store.insert(imposter).await;

        assert!(matches!(result, Err(GatewayError::DuplicateUser)));
        let stored = store.get("admin").await.unwrap().unwrap();
        assert_eq!(stored, user("admin", ROLE_ADMIN));
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.insert(user("alice", ROLE_USER)).await.unwrap();
        store.insert(user("Alice", ROLE_USER)).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_inserts_only_one_wins() {
        let store = Arc::new(InMemoryUserStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert(user("racer", ROLE_USER)).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
