//! Account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authentication identity referencing exactly one user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    id: AccountId,
    /// Globally unique login name
    username: String,
    /// Password digest - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Current session token - never exposed in serialization
    #[serde(default, skip_serializing)]
    token: Option<String>,
    /// Profile owned by this account
    user_id: UserId,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
    /// Last login timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account without an active session
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, user_id: UserId) -> Self {
        let now = Utc::now();

        Self {
            id: AccountId::generate(),
            username: username.into(),
            password_hash: password_hash.into(),
            token: None,
            user_id,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rebuild an account loaded from storage
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: AccountId,
        username: String,
        password_hash: String,
        token: Option<String>,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            token,
            user_id,
            created_at,
            updated_at,
            last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Whether `token` is this account's live session token
    pub fn holds_token(&self, token: &str) -> bool {
        self.token.as_deref() == Some(token)
    }

    // Mutators

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Start a new session, replacing any previous token
    pub fn record_login(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.last_login_at = Some(Utc::now());
        self.touch();
    }

    /// Replace the session token without counting a login
    pub fn replace_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.touch();
    }

    /// End the current session
    pub fn clear_token(&mut self) {
        self.token = None;
        self.touch();
    }

    /// Mark the account as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account(username: &str) -> Account {
        Account::new(username, "hashed_password", UserId::generate())
    }

    #[test]
    fn test_account_creation() {
        let account = create_test_account("jdoe");

        assert_eq!(account.username(), "jdoe");
        assert_eq!(account.password_hash(), "hashed_password");
        assert!(account.token().is_none());
        assert!(account.last_login_at().is_none());
    }

    #[test]
    fn test_account_id_parse() {
        let id = AccountId::generate();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_record_login_sets_token_and_timestamp() {
        let mut account = create_test_account("jdoe");

        account.record_login("token-1");
        assert!(account.holds_token("token-1"));
        assert!(account.last_login_at().is_some());

        account.replace_token("token-2");
        assert!(!account.holds_token("token-1"));
        assert!(account.holds_token("token-2"));
    }

    #[test]
    fn test_clear_token() {
        let mut account = create_test_account("jdoe");
        account.record_login("token-1");

        account.clear_token();
        assert!(account.token().is_none());
        assert!(!account.holds_token("token-1"));
    }

    #[test]
    fn test_update_password() {
        let mut account = create_test_account("jdoe");
        let original_updated = account.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        account.set_password_hash("new_hash");
        assert_eq!(account.password_hash(), "new_hash");
        assert!(account.updated_at() > original_updated);
    }

    #[test]
    fn test_serialization_excludes_secrets() {
        let mut account = create_test_account("jdoe");
        account.record_login("secret-token");

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret-token"));
        assert!(json.contains("jdoe"));
    }
}
