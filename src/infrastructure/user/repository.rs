//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserProfile, UserRepository};
use crate::domain::{DomainError, EntityKind};

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn search(&self, query: &UserProfile) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.matches(query)).cloned())
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.id()) {
            return Err(DomainError::already_exists(
                EntityKind::User,
                format!("User with ID '{}' already exists", user.id()),
            ));
        }

        if users.values().any(|u| u.matches(user.profile())) {
            return Err(DomainError::already_exists(
                EntityKind::User,
                "A user with this profile is already registered",
            ));
        }

        users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(user.id()) {
            return Err(DomainError::not_found(
                EntityKind::User,
                format!("User '{}' not found", user.id()),
            ));
        }

        if users
            .values()
            .any(|u| u.id() != user.id() && u.matches(user.profile()))
        {
            return Err(DomainError::already_exists(
                EntityKind::User,
                "Another user already has this profile",
            ));
        }

        users.insert(*user.id(), user.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id).is_some())
    }
}
