//! Accounts command - prints every registered account

use crate::infrastructure::storage::connect_pool;

/// Run the accounts command
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = connect_pool(super::require_database(&config, "accounts")?).await?;

    let accounts = crate::create_postgres_service(&config, pool.clone())?
        .list()
        .await;
    pool.close().await;

    println!("{}", serde_json::to_string_pretty(&accounts?)?);

    Ok(())
}
