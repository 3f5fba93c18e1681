//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId, UserProfile};
use crate::domain::DomainError;

/// Repository trait for user profile storage
///
/// `create` and `update` must reject a profile already held by another user
/// with `DomainError::AlreadyExists`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Find a user whose profile matches every field of the query
    async fn search(&self, query: &UserProfile) -> Result<Option<User>, DomainError>;

    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether it existed
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;
}
