use std::{net::SocketAddr, time::Duration};

use clap::{Parser, Subcommand};

/// Command line interface for the Timeline API server
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://timeline.db?mode=rwc")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub database_max_connections: u32,

    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub database_acquire_timeout_secs: u64,

    /// Secret used to sign session tokens. A random one is generated when unset.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Issuer claim set on and required of session tokens
    #[arg(long, env = "JWT_ISSUER")]
    pub jwt_issuer: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run migrations and serve the API (default)
    Serve,
    /// Run database migrations
    Migrate,
    /// Print version information
    Version,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {address}: {e}"))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database_acquire_timeout_secs)
    }
}
