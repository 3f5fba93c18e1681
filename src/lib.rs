//! Menu Accounts
//!
//! Account lifecycle and authentication core for restaurant menu
//! administration:
//! - Registration of a user profile and the account that owns it
//! - Password authentication with pluggable strength and hashing policy
//! - Session tokens issued by a pluggable token authority
//! - In-memory and PostgreSQL stores

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use domain::DomainError;
use infrastructure::{
    account::{AccountService, PostgresAccountRepository},
    auth::JwtTokenAuthority,
    security::Argon2SecurityPolicy,
    user::PostgresUserRepository,
};

/// Account service backed by PostgreSQL stores
pub type PostgresAccountService = AccountService<
    PostgresAccountRepository,
    PostgresUserRepository,
    Argon2SecurityPolicy,
    JwtTokenAuthority,
>;

/// Create an account service with PostgreSQL stores on an existing pool
pub fn create_postgres_service(
    config: &AppConfig,
    pool: PgPool,
) -> Result<PostgresAccountService, DomainError> {
    let (security, tokens) = create_credential_components(config)?;

    info!("Using PostgreSQL account storage");

    Ok(AccountService::new(
        Arc::new(PostgresAccountRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool)),
        security,
        tokens,
    ))
}

fn create_credential_components(
    config: &AppConfig,
) -> Result<(Arc<Argon2SecurityPolicy>, Arc<JwtTokenAuthority>), DomainError> {
    let security = Argon2SecurityPolicy::with_hashing(
        config.security.password.clone(),
        &config.security.hashing,
    )?;
    let tokens = JwtTokenAuthority::new(config.token.clone())?;

    Ok((Arc::new(security), Arc::new(tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainErrorKind;
    use crate::infrastructure::account::{InMemoryAccountRepository, RegisterAccountRequest};
    use crate::infrastructure::user::InMemoryUserRepository;
    use crate::infrastructure::security::HashingConfig;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.security.hashing = HashingConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        };
        config
    }

    #[tokio::test]
    async fn test_in_memory_service_round_trip() {
        let (security, tokens) = create_credential_components(&test_config()).unwrap();
        let service = AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            security,
            tokens,
        );

        service
            .register(RegisterAccountRequest {
                first_name: "Ada".to_string(),
                last_name: "Byron".to_string(),
                address1: "12 Marsh Ln".to_string(),
                address2: None,
                zip_code: "02139".to_string(),
                email: "ada@example.com".to_string(),
                username: "ada".to_string(),
                password: "analytical".to_string(),
                password_confirm: "analytical".to_string(),
            })
            .await
            .unwrap();

        let token = service.authenticate("ada", "analytical").await.unwrap();
        let caller = service.resolve_caller(&token).await.unwrap();
        assert_eq!(caller.username(), "ada");
    }

    #[test]
    fn test_rejects_empty_token_secret() {
        let mut config = test_config();
        config.token.secret = String::new();

        let err = create_credential_components(&config).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_out_of_range_token_expiration() {
        let mut config = test_config();
        config.token.expiration_hours = u64::MAX / 2;

        let err = create_credential_components(&config).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_invalid_hashing_costs() {
        let mut config = test_config();
        config.security.hashing.iterations = 0;

        let err = create_credential_components(&config).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::Configuration);
    }
}
