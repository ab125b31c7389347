//! gql_cache - One-shot GraphQL runner with a persistent response cache
//!
//! Usage: `gql_cache [--mutation] <document> [variables-json]`
//!
//! The endpoint and cache settings come from environment variables (see
//! `ClientConfig::from_env`). When `CACHE_SNAPSHOT` names a file, the cache is
//! hydrated from it before the call and written back afterwards.

use std::env;
use std::path::Path;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gql_cache::cache::{snapshot_from_str, snapshot_to_string};
use gql_cache::{Client, ClientConfig, MutationOptions, QueryOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gql_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let is_mutation = match args.first() {
        Some(flag) if flag == "--mutation" => {
            args.remove(0);
            true
        }
        _ => false,
    };
    let Some(document) = args.first().cloned() else {
        bail!("usage: gql_cache [--mutation] <document> [variables-json]");
    };
    let variables = args
        .get(1)
        .map(|raw| serde_json::from_str(raw))
        .transpose()
        .context("variables must be valid JSON")?;

    let mut config = ClientConfig::from_env()?;
    let snapshot_path = env::var("CACHE_SNAPSHOT").ok();

    if let Some(path) = snapshot_path.as_deref().filter(|p| Path::new(p).exists()) {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading cache snapshot {}", path))?;
        let records = snapshot_from_str(&raw)?;
        info!("Loaded {} cached responses from {}", records.len(), path);
        config = config.with_json_cache(records);
    }

    let client = Client::new(config)?;

    let response = if is_mutation {
        let mut options = MutationOptions::new(document);
        options.variables = variables;
        client.mutation(options).await?
    } else {
        let mut options = QueryOptions::new(document);
        options.variables = variables;
        client.query(options).await?
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(path) = snapshot_path {
        let purged = client.cache().write().await.purge_expired();
        if purged > 0 {
            info!("Dropped {} expired responses before saving", purged);
        }
        let records = client.cache_to_json().await;
        tokio::fs::write(&path, snapshot_to_string(&records)?)
            .await
            .with_context(|| format!("writing cache snapshot {}", path))?;
        info!("Saved {} cached responses to {}", records.len(), path);
    }

    Ok(())
}
