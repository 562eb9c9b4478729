mod api_client;
mod board;
mod config;
mod errors;
mod models;
mod render;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::AtsClient;
use crate::board::{Board, BoardSession};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the board.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting pipeline board v{}", env!("CARGO_PKG_VERSION"));

    let client = AtsClient::from_config(&config).context("Failed to build HTTP client")?;
    info!("ATS API client initialized ({})", config.api_url);

    let applications = client
        .fetch_board()
        .await
        .context("Failed to load the application board")?;
    info!("Loaded {} applications", applications.len());

    let board = Board::from_applications(applications);
    let session = BoardSession::new(board, Arc::new(client.clone()));

    terminal::run(session, client).await
}
