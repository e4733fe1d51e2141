//! inkwell command-line entry point.
//!
//! Runs one query against the content API through the cached store and prints
//! JSON to stdout. Logging goes to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use inkwell_client::{GraphQlClient, Store};
use inkwell_core::{AppConfig, ListCache};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
        config.validate().context("validating --api-url")?;
    }

    tracing::info!(api_url = %config.api_url, policy = %config.default_policy, "Starting inkwell");

    let client = GraphQlClient::from_config(&config)?;
    let store = Store::new(Arc::new(client), Arc::new(ListCache::new()), config.default_policy);

    let output = commands::run(&store, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
