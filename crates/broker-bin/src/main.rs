//! SSO broker command-line tool: run a sync cycle or issue broker commands
//! against the configured SSO server.

mod commands;

use std::path::PathBuf;

use broker_config_and_utils::{default_log_path, init_logging, Config};
use clap::{Parser, Subcommand};

/// SSO broker command-line interface.
#[derive(Parser, Debug)]
#[command(name = "sso-broker")]
#[command(about = "SSO broker session sync tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file. SSO_* environment variables override it.
    #[arg(short, long, global = true, env = "SSO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Defaults to the config value.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Also write JSONL logs, to the config's log_file or ~/.sso-broker/logs/broker.jsonl
    #[arg(long, global = true)]
    persist_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync cycle for a request and print the decision
    Check {
        /// Value of the request's Cookie header
        #[arg(long, default_value = "")]
        cookie: String,
        /// Full URL of the request
        #[arg(long)]
        url: String,
        /// Local user already logged in before the cycle
        #[arg(long)]
        logged_in_as: Option<String>,
    },
    /// Print the broker session id for a token
    SessionId {
        #[arg(long)]
        token: String,
    },
    /// Print the URL that attaches a token to the SSO session
    AttachUrl {
        #[arg(long)]
        token: String,
        /// Where the SSO server sends the browser afterwards
        #[arg(long)]
        return_url: String,
    },
    /// End the SSO server session attached to a token
    Logout {
        #[arg(long)]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let log_file = match (&config.log_file, cli.persist_logs) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => default_log_path(),
        (None, false) => None,
    };
    init_logging(level, log_file);

    tracing::debug!(config = ?config, "Loaded broker configuration");

    match cli.command {
        Commands::Check {
            cookie,
            url,
            logged_in_as,
        } => commands::check(&config, &cookie, &url, logged_in_as).await?,
        Commands::SessionId { token } => commands::session_id(&config, &token)?,
        Commands::AttachUrl { token, return_url } => {
            commands::attach_url(&config, &token, &return_url)?
        }
        Commands::Logout { token } => commands::logout(&config, &token).await?,
    }

    Ok(())
}
