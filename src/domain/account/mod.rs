//! Account domain
//!
//! This module provides domain types and traits for authentication
//! identities: the account entity, username validation and the repository
//! trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountId};
pub use repository::AccountRepository;
pub use validation::{validate_username, AccountValidationError};

#[cfg(test)]
pub use repository::MockAccountRepository;
