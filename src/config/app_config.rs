use serde::Deserialize;

use crate::domain::security::PasswordRules;
use crate::infrastructure::auth::JwtConfig;
use crate::infrastructure::security::HashingConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub token: JwtConfig,
    /// In-memory stores are used when absent
    pub database: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Password strength rules and hashing costs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub password: PasswordRules,
    pub hashing: HashingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_overrides(overrides: &[(&str, &str)]) -> AppConfig {
        let mut builder = config::Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.security.password.length, 8);
        assert!(config.security.password.check_previous);
        assert!(!config.security.password.mixed_case);
        assert_eq!(config.token.expiration_hours, 24);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_overrides(&[]);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.password, PasswordRules::default());
        assert!(config.database.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_overrides(&[
            ("logging.format", "json"),
            ("security.password.length", "12"),
            ("security.password.special_char", "true"),
            ("token.secret", "s3cret"),
            ("database.url", "postgres://db/menu"),
        ]);

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.security.password.length, 12);
        assert!(config.security.password.special_char);
        assert_eq!(config.token.secret, "s3cret");

        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://db/menu");
        assert_eq!(database.max_connections, 10);
    }
}
