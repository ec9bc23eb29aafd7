mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use timeline::{JwtConfig, SqliteRepositoryProvider, Timeline};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "info,timeline=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command() {
        Commands::Version => {
            println!("Timeline v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Migrate => {
            let timeline = build_timeline(&cli).await?;
            timeline.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
            Ok(())
        }
        Commands::Serve => serve(&cli).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn jwt_config(cli: &Cli) -> anyhow::Result<JwtConfig> {
    let config = match cli.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => JwtConfig::new_hs256(secret.as_bytes().to_vec()),
        _ => {
            tracing::warn!(
                "JWT_SECRET is not set; using a random secret. Sessions will not survive a restart"
            );
            JwtConfig::new_random_hs256().context("Failed to generate JWT secret")?
        }
    };

    Ok(match cli.jwt_issuer.as_deref() {
        Some(issuer) => config.with_issuer(issuer),
        None => config,
    })
}

async fn build_timeline(cli: &Cli) -> anyhow::Result<Timeline<SqliteRepositoryProvider>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(cli.database_max_connections)
        .acquire_timeout(cli.acquire_timeout())
        .connect(&cli.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", cli.database_url))?;

    let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
    Ok(Timeline::new(repositories, jwt_config(cli)?))
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    let address = cli.bind_address()?;

    let timeline = build_timeline(cli).await?;
    timeline.migrate().await.context("Failed to run migrations")?;

    let app = timeline_axum::create_router(Arc::new(timeline));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(%address, version = env!("CARGO_PKG_VERSION"), "Timeline API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
