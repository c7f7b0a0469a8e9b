//! insiders - Insiders Club console
//!
//! Sign-up / sign-in flows, the admin customer table and the customer
//! profile, against the Insiders Club backend.

mod cli;
mod commands;
mod form;
mod logger;
mod output;

use std::process::ExitCode;

use clap::Parser;
use insiders_client::{ClientConfig, InsidersClient, SessionContext};

use crate::cli::Cli;

fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(profile) = &cli.profile {
        config.profile = profile.parse()?;
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, profile = ?config.profile, "Configuration loaded");

    let client = InsidersClient::new(config)?;
    let mut session = SessionContext::load(&cli.session_dir)?;
    tracing::debug!(path = %session.path().display(), "Session loaded");
    client.attach_session(&session);

    commands::run(cli.command, &client, &mut session).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = logger::init_logger(cli.log_json) {
        eprintln!("Failed to initialise logging: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
