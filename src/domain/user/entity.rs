//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
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

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile and contact fields of a user
///
/// Also serves as the search key when checking whether a profile is
/// already registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub zip_code: String,
    pub email: String,
}

/// User entity holding profile facts for exactly one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    #[serde(flatten)]
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated identifier
    pub fn new(profile: UserProfile) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user loaded from storage
    pub fn from_parts(
        id: UserId,
        profile: UserProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn first_name(&self) -> &str {
        &self.profile.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.profile.last_name
    }

    pub fn address1(&self) -> &str {
        &self.profile.address1
    }

    pub fn address2(&self) -> Option<&str> {
        self.profile.address2.as_deref()
    }

    pub fn zip_code(&self) -> &str {
        &self.profile.zip_code
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether every profile field equals the query
    ///
    /// Email is compared case-insensitively.
    pub fn matches(&self, query: &UserProfile) -> bool {
        let p = &self.profile;

        p.first_name == query.first_name
            && p.last_name == query.last_name
            && p.address1 == query.address1
            && p.address2 == query.address2
            && p.zip_code == query.zip_code
            && p.email.eq_ignore_ascii_case(&query.email)
    }

    // Mutators

    /// Update the address; line 2 is only replaced when supplied
    pub fn set_address(&mut self, address1: impl Into<String>, address2: Option<String>) {
        self.profile.address1 = address1.into();
        if address2.is_some() {
            self.profile.address2 = address2;
        }
        self.touch();
    }

    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) {
        self.profile.zip_code = zip_code.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.profile.email = email.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> UserProfile {
        UserProfile {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address1: "1 Main St".to_string(),
            address2: Some("Apt 2".to_string()),
            zip_code: "10001".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn test_user_id_parse_and_display() {
        let id = UserId::generate();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn test_user_creation() {
        let user = User::new(jane());

        assert_eq!(user.first_name(), "Jane");
        assert_eq!(user.last_name(), "Doe");
        assert_eq!(user.address2(), Some("Apt 2"));
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_matches_profile() {
        let user = User::new(jane());
        assert!(user.matches(&jane()));

        let mut shouting = jane();
        shouting.email = "JANE@EXAMPLE.COM".to_string();
        assert!(user.matches(&shouting));

        let mut other = jane();
        other.zip_code = "94110".to_string();
        assert!(!user.matches(&other));
    }

    #[test]
    fn test_set_address_keeps_line_two_when_absent() {
        let mut user = User::new(jane());

        user.set_address("2 Side St", None);
        assert_eq!(user.address1(), "2 Side St");
        assert_eq!(user.address2(), Some("Apt 2"));

        user.set_address("3 Back St", Some("Unit 9".to_string()));
        assert_eq!(user.address2(), Some("Unit 9"));
    }

    #[test]
    fn test_mutation_touches_updated_at() {
        let mut user = User::new(jane());
        let original = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_email("jane.doe@example.com");
        assert_eq!(user.email(), "jane.doe@example.com");
        assert!(user.updated_at() > original);
    }

    #[test]
    fn test_serialization_flattens_profile() {
        let user = User::new(jane());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["zip_code"], "10001");
        assert!(json.get("profile").is_none());
    }
}
