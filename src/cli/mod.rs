//! CLI module for Menu Accounts
//!
//! Provides subcommands for operating the account core:
//! - `migrate`: apply or revert the PostgreSQL schema
//! - `accounts`: list registered accounts
//! - `check-password`: test a password against the configured rules

pub mod accounts;
pub mod check_password;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::PostgresConfig;

/// Menu Accounts - account lifecycle and authentication for menu administration
#[derive(Parser)]
#[command(name = "menu-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending schema migrations
    Migrate(migrate::MigrateArgs),

    /// List registered accounts as JSON
    Accounts,

    /// Check a password against the configured strength rules
    CheckPassword(check_password::CheckPasswordArgs),
}

/// Load `.env`, read configuration and install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// The database section, which store-backed commands cannot run without
fn require_database<'a>(
    config: &'a AppConfig,
    command: &str,
) -> anyhow::Result<&'a PostgresConfig> {
    config
        .database
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("`{}` requires a database configuration", command))
}
