//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Account, AccountId};
use crate::domain::DomainError;

/// Repository trait for account storage
///
/// Implementations own the uniqueness guarantees: `create` and `update` must
/// reject a username or session token already held by another account with
/// `DomainError::AlreadyExists`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by its username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Get the account currently holding a session token
    async fn find_by_token(&self, token: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Delete an account, returning whether it existed
    async fn delete(&self, id: &AccountId) -> Result<bool, DomainError>;

    /// List every account
    async fn list(&self) -> Result<Vec<Account>, DomainError>;
}
