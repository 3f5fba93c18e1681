//! Security policy trait

use std::fmt::Debug;

use super::rules::{PasswordRule, PasswordRules};
use crate::domain::DomainError;

/// Governs password strength, hashing and comparison
pub trait SecurityPolicy: Send + Sync + Debug {
    /// The strength rules this policy enforces
    fn rules(&self) -> &PasswordRules;

    /// Compare a password with its confirmation without leaking timing
    fn confirmation_matches(&self, password: &str, confirmation: &str) -> bool;

    /// Check a password against the configured strength rules
    fn is_valid(&self, password: &str) -> Result<(), DomainError> {
        self.rules()
            .evaluate(password)
            .map_err(DomainError::weak_credential)
    }

    /// One-way hash of a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a candidate password against a stored digest
    fn verify_password_matches(&self, digest: &str, candidate: &str) -> bool;

    /// Reject a new password equal to the one behind `previous_digest`
    ///
    /// Only enforced when `check_previous` is enabled.
    fn ensure_distinct(&self, previous_digest: &str, candidate: &str) -> Result<(), DomainError> {
        if self.rules().check_previous && self.verify_password_matches(previous_digest, candidate)
        {
            return Err(DomainError::weak_credential(PasswordRule::ReusedPassword));
        }

        Ok(())
    }
}
