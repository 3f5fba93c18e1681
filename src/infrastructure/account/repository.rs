//! In-memory account repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::{DomainError, EntityKind};

#[derive(Debug, Default)]
struct AccountTable {
    accounts: HashMap<AccountId, Account>,
    /// username -> account ID
    username_index: HashMap<String, AccountId>,
    /// session token -> account ID
    token_index: HashMap<String, AccountId>,
}

impl AccountTable {
    fn index(&mut self, account: &Account) {
        self.username_index
            .insert(account.username().to_string(), *account.id());

        if let Some(token) = account.token() {
            self.token_index.insert(token.to_string(), *account.id());
        }
    }

    fn unindex(&mut self, account: &Account) {
        self.username_index.remove(account.username());

        if let Some(token) = account.token() {
            self.token_index.remove(token);
        }
    }

    fn check_unique(&self, account: &Account) -> Result<(), DomainError> {
        let id = account.id();

        if matches!(self.username_index.get(account.username()), Some(owner) if owner != id) {
            return Err(DomainError::already_exists(
                EntityKind::Account,
                format!("Username '{}' already exists", account.username()),
            ));
        }

        if let Some(token) = account.token() {
            if matches!(self.token_index.get(token), Some(owner) if owner != id) {
                return Err(DomainError::already_exists(
                    EntityKind::Account,
                    "Session token already assigned to another account",
                ));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of AccountRepository
///
/// One lock guards the accounts and both indexes so uniqueness checks and
/// writes are atomic.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    table: Arc<RwLock<AccountTable>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let table = self.table.read().await;
        Ok(table.accounts.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.accounts.get(id))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .token_index
            .get(token)
            .and_then(|id| table.accounts.get(id))
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut table = self.table.write().await;

        if table.accounts.contains_key(account.id()) {
            return Err(DomainError::already_exists(
                EntityKind::Account,
                format!("Account with ID '{}' already exists", account.id()),
            ));
        }

        table.check_unique(&account)?;
        table.index(&account);
        table.accounts.insert(*account.id(), account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut table = self.table.write().await;

        let previous = table.accounts.get(account.id()).cloned().ok_or_else(|| {
            DomainError::not_found(
                EntityKind::Account,
                format!("Account '{}' not found", account.id()),
            )
        })?;

        table.check_unique(account)?;
        table.unindex(&previous);
        table.index(account);
        table.accounts.insert(*account.id(), account.clone());

        Ok(account.clone())
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        match table.accounts.remove(id) {
            Some(account) => {
                table.unindex(&account);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let table = self.table.read().await;
        Ok(table.accounts.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn create_test_account(username: &str) -> Account {
        Account::new(username, "hashed_password", UserId::generate())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("jdoe");

        repo.create(account.clone()).await.unwrap();

        let retrieved = repo.get(account.id()).await.unwrap();
        assert_eq!(retrieved.unwrap().username(), "jdoe");
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("jdoe");

        repo.create(account.clone()).await.unwrap();

        let found = repo.find_by_username("jdoe").await.unwrap();
        assert_eq!(found.unwrap().id(), account.id());

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = InMemoryAccountRepository::new();

        repo.create(create_test_account("jdoe")).await.unwrap();

        let result = repo.create(create_test_account("jdoe")).await;
        assert!(matches!(
            result,
            Err(DomainError::AlreadyExists {
                entity: EntityKind::Account,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_token_index_follows_updates() {
        let repo = InMemoryAccountRepository::new();
        let mut account = create_test_account("jdoe");
        repo.create(account.clone()).await.unwrap();

        account.record_login("token-1");
        repo.update(&account).await.unwrap();
        assert!(repo.find_by_token("token-1").await.unwrap().is_some());

        account.replace_token("token-2");
        repo.update(&account).await.unwrap();
        assert!(repo.find_by_token("token-1").await.unwrap().is_none());
        assert!(repo.find_by_token("token-2").await.unwrap().is_some());

        account.clear_token();
        repo.update(&account).await.unwrap();
        assert!(repo.find_by_token("token-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_uniqueness() {
        let repo = InMemoryAccountRepository::new();
        let mut first = create_test_account("first");
        let mut second = create_test_account("second");
        repo.create(first.clone()).await.unwrap();
        repo.create(second.clone()).await.unwrap();

        first.record_login("shared");
        repo.update(&first).await.unwrap();

        second.record_login("shared");
        let result = repo.update(&second).await;
        assert!(matches!(result, Err(DomainError::AlreadyExists { .. })));

        // Rejected update leaves the stored account untouched
        let stored = repo.get(second.id()).await.unwrap().unwrap();
        assert!(stored.token().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("jdoe");

        let result = repo.update(&account).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_clears_indexes() {
        let repo = InMemoryAccountRepository::new();
        let mut account = create_test_account("jdoe");
        account.record_login("token-1");
        repo.create(account.clone()).await.unwrap();

        assert!(repo.delete(account.id()).await.unwrap());
        assert!(!repo.delete(account.id()).await.unwrap());

        assert!(repo.find_by_username("jdoe").await.unwrap().is_none());
        assert!(repo.find_by_token("token-1").await.unwrap().is_none());

        // Username is free again
        repo.create(create_test_account("jdoe")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list() {
        let repo = InMemoryAccountRepository::new();

        repo.create(create_test_account("first")).await.unwrap();
        repo.create(create_test_account("second")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
