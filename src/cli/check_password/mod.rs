//! Check-password command - evaluates a password against the configured rules

use std::io::BufRead;

use clap::Args;

use crate::domain::security::SecurityPolicy;
use crate::infrastructure::security::Argon2SecurityPolicy;

/// Arguments for the check-password command
#[derive(Args, Clone)]
pub struct CheckPasswordArgs {
    /// Password to check; read from stdin when omitted
    pub password: Option<String>,

    /// Confirmation that must match the password
    #[arg(long)]
    pub confirm: Option<String>,
}

/// Run the check-password command
pub async fn run(args: CheckPasswordArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let password = match args.password {
        Some(password) => password,
        None => read_line()?,
    };

    let policy = Argon2SecurityPolicy::new(config.security.password);

    if let Some(confirm) = &args.confirm {
        if !policy.confirmation_matches(&password, confirm) {
            anyhow::bail!("password and confirmation do not match");
        }
    }

    policy.is_valid(&password)?;
    println!("Password satisfies the configured rules");

    Ok(())
}

fn read_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
