//! Account infrastructure module
//!
//! Account stores and the service that drives the account lifecycle.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresAccountRepository;
pub use repository::InMemoryAccountRepository;
pub use service::{
    AccountService, ChangePasswordRequest, RegisterAccountRequest, UpdateAccountRequest,
};
