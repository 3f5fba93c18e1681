//! Token authority trait

use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::claims::AccountClaims;
use crate::domain::account::Account;
use crate::domain::DomainError;

/// Issues and validates opaque bearer tokens bound to an account
#[cfg_attr(test, automock)]
pub trait TokenAuthority: Send + Sync + Debug {
    /// Issue a fresh, unguessable token for an account
    fn generate_token(&self, account: &Account) -> Result<String, DomainError>;

    /// Check that a presented token was issued by this authority and is live
    fn token_valid(&self, token: &str) -> Result<(), DomainError> {
        self.extract_claims(token).map(|_| ())
    }

    /// Decode the claims of a presented token
    fn extract_claims(&self, token: &str) -> Result<AccountClaims, DomainError>;
}
