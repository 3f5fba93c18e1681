//! Domain layer - Accounts, users, credentials and session tokens

pub mod account;
pub mod error;
pub mod security;
pub mod token;
pub mod user;

pub use account::{Account, AccountId, AccountRepository};
pub use error::{DomainError, DomainErrorKind, EntityKind};
pub use security::{PasswordRule, PasswordRules, SecurityPolicy};
pub use token::{AccountClaims, CallerIdentity, TokenAuthority};
pub use user::{User, UserId, UserProfile, UserRepository};
