//! JWT session token authority

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use std::fmt::Debug;

use crate::domain::account::Account;
use crate::domain::token::{expiry_from, AccountClaims, TokenAuthority};
use crate::domain::DomainError;

/// Configuration for the JWT authority
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
        }
    }
}

/// HMAC-signed JWT token authority
#[derive(Clone)]
pub struct JwtTokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiration_hours: u64,
}

impl Debug for JwtTokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenAuthority")
            .field("algorithm", &self.algorithm)
            .field("expiration_hours", &self.expiration_hours)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtTokenAuthority {
    /// Create an HS256 authority from a shared secret
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::configuration("JWT secret cannot be empty"));
        }

        if config.expiration_hours == 0 {
            return Err(DomainError::configuration(
                "JWT expiration must be at least one hour",
            ));
        }

        if expiry_from(Utc::now(), config.expiration_hours).is_none() {
            return Err(DomainError::configuration(format!(
                "JWT expiration of {} hours is out of range",
                config.expiration_hours
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: Algorithm::HS256,
            expiration_hours: config.expiration_hours,
        })
    }
}

impl TokenAuthority for JwtTokenAuthority {
    fn generate_token(&self, account: &Account) -> Result<String, DomainError> {
        let claims = AccountClaims::issue(account, self.expiration_hours)?;

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| DomainError::token(format!("Failed to generate JWT: {}", e)))
    }

    fn extract_claims(&self, token: &str) -> Result<AccountClaims, DomainError> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<AccountClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}
