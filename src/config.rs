// ⚙️ Configuration - command line flags with environment fallbacks

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default location of the data file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "person_finance.csv";

/// Default listen address of the web server
pub const DEFAULT_BIND: &str = "127.0.0.1:8050";

/// Options shared by every binary
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// CSV file holding the records (created with example data if missing)
    #[arg(long, env = "FINANCE_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Log level for this crate (overridden by RUST_LOG)
    #[arg(long, env = "FINANCE_LOG", default_value = "info")]
    pub log_level: String,
}

// ============================================================================
// CLI / TUI BINARY
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "finance-dashboard", version, about = "Personal finance dashboard")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Add one entry
    Add {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        income: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        expenses: Option<String>,
    },
    /// Remove every entry on a date
    Remove {
        #[arg(long)]
        date: Option<String>,
    },
    /// Print all entries
    List,
}

// ============================================================================
// SERVER BINARY
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "finance-server", version, about = "Personal finance dashboard web server")]
pub struct ServerArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Address to listen on
    #[arg(long, env = "FINANCE_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise `level` applies to this crate's targets;
/// `None` turns logging off (used by the TUI, which owns the terminal).
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match (EnvFilter::try_from_default_env(), level) {
        (Ok(filter), _) => filter,
        (Err(_), Some(level)) => EnvFilter::try_new(format!(
            "finance_dashboard={level},finance_server={level},tower_http=warn"
        ))?,
        (Err(_), None) => EnvFilter::new("off"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
