//! KycLedger CLI - Main entry point
//!
//! # Usage
//! ```bash
//! kycledger init
//! kycledger invoke registerBank ABC
//! kycledger invoke createKycProfile U1 ABC Alice
//! kycledger invoke kycByBank ABC
//! kycledger --db :memory: invoke kycCounts ABC
//! kycledger reconcile
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use kycledger_rpc::AppContext;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kycledger")]
#[command(about = "KycLedger - shared KYC records for banks", long_about = None)]
struct Cli {
    /// SQLite database path (`:memory:` for a throwaway database)
    #[arg(long, default_value = "data/kyc.db")]
    db: PathBuf,

    /// Optional JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tables and the bank index if absent
    Init,

    /// Run a named operation, printing its JSON payload if any
    Invoke {
        /// Operation name, e.g. createKycProfile
        operation: String,
        /// Positional string arguments
        args: Vec<String>,
    },

    /// Rebuild missing bank index and user list entries
    Reconcile,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let mut ctx = AppContext::open(&cli.db, cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            println!("Ledger initialized at {}", cli.db.display());
        }

        Commands::Invoke { operation, args } => {
            if let Some(payload) = ctx.invoke(&operation, &args)? {
                println!("{}", String::from_utf8_lossy(&payload));
            }
        }

        Commands::Reconcile => {
            let report = ctx.reconcile()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
