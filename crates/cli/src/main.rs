//! tipcheck-cli: run validations and allowance lookups directly against the
//! configured upstreams, and maintain the local cache.
//!
//! Reads the same `TIPCHECK_*` configuration as the server. Caller
//! authorization does not apply here; results go to stdout as JSON and logs to stderr.

mod args;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use tipcheck_client::{AllowanceClient, AllowanceConfig, build_validation_service};
use tipcheck_core::{AppConfig, CacheDb, CastReference};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let output = match cli.command {
        Commands::Validate { cast_url, force_refresh } => {
            let cast = CastReference::parse(&cast_url)?;
            let service = build_validation_service(&config).await?;
            let outcome = service.validate_cast(&cast, force_refresh).await?;
            json!({ "data": outcome })
        }
        Commands::Allowance { fid } => {
            let client = AllowanceClient::new(AllowanceConfig::from(&config))?;
            match client.allowance(fid).await? {
                Some(data) => json!({ "data": data }),
                None => json!({}),
            }
        }
        Commands::Purge => {
            let Some(path) = &config.db_path else {
                bail!("purge needs a SQLite cache; set TIPCHECK_DB_PATH");
            };
            let db = CacheDb::open(path)
                .await
                .with_context(|| format!("failed to open cache database at {}", path.display()))?;
            let deleted = db.purge_expired().await?;
            tracing::info!(deleted, "purged expired cache entries");
            json!({ "deleted": deleted })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
