//! Messenger - command-line access to the Messenger chat API.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use messenger_client::{ClientBuilder, ClientConfig};

mod commands;

use commands::{chat, download, group, user};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Messenger - command-line access to the Messenger chat API
#[derive(Parser)]
#[command(name = "messenger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Bearer token
    #[arg(long, global = true, env = "MESSENGER_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// URL scheme (default: https)
    #[arg(long, global = true, env = "MESSENGER_API_TRANSPORT")]
    pub protocol: Option<String>,

    /// API host (default: api.alterdesk.com)
    #[arg(long, global = true, env = "MESSENGER_API_DOMAIN")]
    pub domain: Option<String>,

    /// API version (default: v1)
    #[arg(long, global = true, env = "MESSENGER_API_VERSION")]
    pub api_version: Option<String>,

    /// API port (default: 443)
    #[arg(long, global = true, env = "MESSENGER_API_PORT")]
    pub port: Option<u16>,

    /// Directory that receives downloads
    #[arg(long, global = true, env = "MESSENGER_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up users
    User(user::UserArgs),

    /// Read chats and send messages
    Chat(chat::ChatArgs),

    /// Manage group chats
    Group(group::GroupArgs),

    /// Download attachments and chat exports
    Download(download::DownloadArgs),
}

impl Cli {
    /// Built-in defaults, overridden by whatever was passed or set in the environment.
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(protocol) = &self.protocol {
            config.protocol = protocol.clone();
        }
        if let Some(domain) = &self.domain {
            config.domain = domain.clone();
        }
        if let Some(version) = &self.api_version {
            config.version = version.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
        config
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "messenger=debug,messenger_client=debug,info"
    } else {
        "messenger=info,messenger_client=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let client = ClientBuilder::new().config(cli.client_config()).build()?;
    tracing::debug!(base_url = %client.base_url(), "Client configured");

    let ctx = commands::Context {
        client,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::User(args) => user::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Group(args) => group::run(args, &ctx).await,
        Commands::Download(args) => download::run(args, &ctx).await,
    }
}
