//! Token claims and caller identity

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId};
use crate::domain::DomainError;

/// Identity asserted by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

impl AccountClaims {
    /// Create fresh claims for an account
    ///
    /// Fails when the expiration falls outside the representable time range.
    pub(crate) fn issue(account: &Account, expiration_hours: u64) -> Result<Self, DomainError> {
        let now = Utc::now();
        let exp = expiry_from(now, expiration_hours).ok_or_else(|| {
            DomainError::token(format!(
                "Token expiration of {} hours is out of range",
                expiration_hours
            ))
        })?;

        Ok(Self {
            sub: account.id().to_string(),
            username: account.username().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Parse the subject as an account ID
    pub fn account_id(&self) -> Result<AccountId, DomainError> {
        self.sub
            .parse()
            .map_err(|e| DomainError::unauthorized(format!("Malformed token subject: {}", e)))
    }
}

/// Expiration instant `hours` after `now`, if representable
pub(crate) fn expiry_from(now: DateTime<Utc>, hours: u64) -> Option<DateTime<Utc>> {
    let hours = i64::try_from(hours).ok()?;
    now.checked_add_signed(TimeDelta::try_hours(hours)?)
}

/// Authenticated caller, derived from validated claims
///
/// Delivery layers obtain one through `AccountService::resolve_caller` and
/// pass it explicitly to account-scoped operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    account_id: AccountId,
    username: String,
}

impl CallerIdentity {
    pub fn from_claims(claims: &AccountClaims) -> Result<Self, DomainError> {
        Ok(Self {
            account_id: claims.account_id()?,
            username: claims.username.clone(),
        })
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
