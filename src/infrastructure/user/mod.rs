//! User infrastructure module
//!
//! In-memory and PostgreSQL implementations of the user profile store.

mod postgres_repository;
mod repository;

pub(crate) use postgres_repository::is_unique_violation;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
