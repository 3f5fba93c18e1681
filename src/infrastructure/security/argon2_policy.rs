//! Password hashing and strength policy using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;

use crate::domain::security::{PasswordRules, SecurityPolicy};
use crate::domain::DomainError;

/// Argon2id cost parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2-based security policy
#[derive(Debug, Clone, Default)]
pub struct Argon2SecurityPolicy {
    rules: PasswordRules,
    params: Params,
}

impl Argon2SecurityPolicy {
    /// Create a policy enforcing the given strength rules with default costs
    pub fn new(rules: PasswordRules) -> Self {
        Self {
            rules,
            params: Params::default(),
        }
    }

    /// Create a policy with explicit Argon2id costs
    pub fn with_hashing(rules: PasswordRules, hashing: &HashingConfig) -> Result<Self, DomainError> {
        let params = Params::new(
            hashing.memory_kib,
            hashing.iterations,
            hashing.parallelism,
            None,
        )
        .map_err(|e| DomainError::configuration(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self { rules, params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl SecurityPolicy for Argon2SecurityPolicy {
    fn rules(&self) -> &PasswordRules {
        &self.rules
    }

    fn confirmation_matches(&self, password: &str, confirmation: &str) -> bool {
        constant_time_compare(password, confirmation)
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password_matches(&self, digest: &str, candidate: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2()
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security::PasswordRule;

    fn cheap_hashing() -> HashingConfig {
        HashingConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn create_policy() -> Argon2SecurityPolicy {
        Argon2SecurityPolicy::with_hashing(PasswordRules::default(), &cheap_hashing()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let policy = create_policy();
        let password = "Abc123!@";

        let hash = policy.hash(password).unwrap();

        assert_ne!(hash, password);
        assert!(policy.verify_password_matches(&hash, password));
        assert!(!policy.verify_password_matches(&hash, "Abc123!#"));
    }

    #[test]
    fn test_hash_is_unique() {
        let policy = create_policy();
        let password = "my_secure_password";

        let hash1 = policy.hash(password).unwrap();
        let hash2 = policy.hash(password).unwrap();

        // Random salt per hash
        assert_ne!(hash1, hash2);

        assert!(policy.verify_password_matches(&hash1, password));
        assert!(policy.verify_password_matches(&hash2, password));
    }

    #[test]
    fn test_default_costs_verify_across_policies() {
        let policy = Argon2SecurityPolicy::new(PasswordRules::default());
        let hash = policy.hash("Abc123!@").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        // Costs are read back from the digest
        assert!(create_policy().verify_password_matches(&hash, "Abc123!@"));
    }

    #[test]
    fn test_invalid_hashing_config() {
        let result = Argon2SecurityPolicy::with_hashing(
            PasswordRules::default(),
            &HashingConfig {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let policy = create_policy();

        assert!(!policy.verify_password_matches("invalid_hash_format", "password"));
        assert!(!policy.verify_password_matches("", "password"));
    }

    #[test]
    fn test_confirmation_matches() {
        let policy = create_policy();

        assert!(policy.confirmation_matches("Abc123!@", "Abc123!@"));
        assert!(!policy.confirmation_matches("Abc123!@", "Abc123!#"));
        assert!(!policy.confirmation_matches("Abc123!@", "Abc123!@ "));
        assert!(policy.confirmation_matches("", ""));
    }

    #[test]
    fn test_is_valid_uses_configured_rules() {
        let lenient = create_policy();
        assert!(lenient.is_valid("abcdefgh").is_ok());

        let strict = Argon2SecurityPolicy::new(PasswordRules {
            mixed_case: true,
            alpha_num: true,
            special_char: true,
            ..PasswordRules::default()
        });
        assert!(strict.is_valid("Abcdef12!").is_ok());
        match strict.is_valid("abcdefgh") {
            Err(DomainError::WeakCredential { rule }) => assert_eq!(rule, PasswordRule::MixedCase),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_ensure_distinct() {
        let policy = create_policy();
        let hash = policy.hash("old_password").unwrap();

        assert!(policy.ensure_distinct(&hash, "new_password").is_ok());
        assert!(matches!(
            policy.ensure_distinct(&hash, "old_password"),
            Err(DomainError::WeakCredential {
                rule: PasswordRule::ReusedPassword
            })
        ));

        let relaxed = Argon2SecurityPolicy::with_hashing(
            PasswordRules {
                check_previous: false,
                ..PasswordRules::default()
            },
            &cheap_hashing(),
        )
        .unwrap();
        assert!(relaxed.ensure_distinct(&hash, "old_password").is_ok());
    }
}
