use thiserror::Error;

use super::security::PasswordRule;

/// Entity a domain error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Account,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Account => write!(f, "account"),
        }
    }
}

/// Discriminant of [`DomainError`] for callers that branch on the kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    AlreadyExists,
    CredentialMismatch,
    WeakCredential,
    Unauthorized,
    NotFound,
    Storage,
    Validation,
    Token,
    Configuration,
    Internal,
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Already exists: {message}")]
    AlreadyExists { entity: EntityKind, message: String },

    #[error("Password and confirmation do not match")]
    CredentialMismatch,

    #[error("Weak credential: {rule}")]
    WeakCredential { rule: PasswordRule },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound { entity: EntityKind, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Token error: {message}")]
    Token { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn already_exists(entity: EntityKind, message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            message: message.into(),
        }
    }

    pub fn weak_credential(rule: PasswordRule) -> Self {
        Self::WeakCredential { rule }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(entity: EntityKind, message: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn token(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> DomainErrorKind {
        match self {
            Self::AlreadyExists { .. } => DomainErrorKind::AlreadyExists,
            Self::CredentialMismatch => DomainErrorKind::CredentialMismatch,
            Self::WeakCredential { .. } => DomainErrorKind::WeakCredential,
            Self::Unauthorized { .. } => DomainErrorKind::Unauthorized,
            Self::NotFound { .. } => DomainErrorKind::NotFound,
            Self::Storage { .. } => DomainErrorKind::Storage,
            Self::Validation { .. } => DomainErrorKind::Validation,
            Self::Token { .. } => DomainErrorKind::Token,
            Self::Configuration { .. } => DomainErrorKind::Configuration,
            Self::Internal { .. } => DomainErrorKind::Internal,
        }
    }

    /// True for rejections caused by a domain rule rather than infrastructure
    pub fn is_domain_rejection(&self) -> bool {
        !matches!(
            self.kind(),
            DomainErrorKind::Storage
                | DomainErrorKind::Token
                | DomainErrorKind::Configuration
                | DomainErrorKind::Internal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found(EntityKind::Account, "Account 'jdoe' not found");
        assert_eq!(error.to_string(), "Not found: Account 'jdoe' not found");
        assert_eq!(error.kind(), DomainErrorKind::NotFound);
    }

    #[test]
    fn test_already_exists_carries_entity() {
        let error = DomainError::already_exists(EntityKind::User, "Profile already registered");

        match error {
            DomainError::AlreadyExists { entity, .. } => assert_eq!(entity, EntityKind::User),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_weak_credential_names_rule() {
        let error = DomainError::weak_credential(PasswordRule::MixedCase);
        assert_eq!(error.kind(), DomainErrorKind::WeakCredential);
        assert!(error.to_string().contains("upper and lower case"));
    }

    #[test]
    fn test_domain_rejection_split() {
        assert!(DomainError::CredentialMismatch.is_domain_rejection());
        assert!(DomainError::unauthorized("bad password").is_domain_rejection());
        assert!(!DomainError::storage("connection reset").is_domain_rejection());
        assert!(!DomainError::token("signing failed").is_domain_rejection());
    }
}
