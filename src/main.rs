use clap::Parser;
use menu_accounts::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate(args) => cli::migrate::run(args).await,
        Command::Accounts => cli::accounts::run().await,
        Command::CheckPassword(args) => cli::check_password::run(args).await,
    }
}
