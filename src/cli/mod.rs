use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::application::LedgerService;
use crate::domain::{BalanceView, canonical_payload, format_cents, payload_digest};
use crate::http::{ServerConfig, serve_with_shutdown};
use crate::io::load_seed;

/// Simulated bank ledger API
#[derive(Parser)]
#[command(name = "ledger-sim")]
#[command(about = "A simulated bank ledger HTTP API with a hash-verified transfer journal")]
#[command(version)]
pub struct Cli {
    /// Journal database file path
    #[arg(short, long, env = "LEDGER_DATABASE", default_value = "ledger.db", global = true)]
    pub database: String,

    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "JSON_LOGS", global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "LEDGER_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "LEDGER_PORT", default_value = "3000")]
        port: u16,

        /// JSON seed file replacing the built-in accounts
        #[arg(long, env = "LEDGER_SEED_FILE")]
        seed: Option<PathBuf>,
    },

    /// Print the seed balances
    Balances {
        /// JSON seed file replacing the built-in accounts
        #[arg(long, env = "LEDGER_SEED_FILE")]
        seed: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Compute the hash expected by the journal endpoint for a payload
    Digest {
        /// Account identifier
        account: String,

        /// Amount, sent as a JSON number when it parses as one
        amount: String,
    },

    /// List recorded journal transfers
    Journal {
        /// Only show entries for this account
        #[arg(long)]
        account: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_tracing(&self.log_level, self.json_logs);

        match self.command {
            Commands::Serve { host, port, seed } => {
                let seed = load_seed(seed.as_deref())?;
                let service = LedgerService::init(&self.database, seed)
                    .await
                    .context("Failed to initialize ledger service")?;

                let config = ServerConfig { host, port };
                serve_with_shutdown(Arc::new(service), config, shutdown_signal())
                    .await
                    .context("Server error")?;
                info!("Server stopped");
            }

            Commands::Balances { seed, format } => {
                let views: Vec<BalanceView> =
                    load_seed(seed.as_deref())?.iter().map(BalanceView::from).collect();
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
                    OutputFormat::Table => {
                        println!("{:<66} {:>32}", "HASH", "BALANCE");
                        println!("{}", "-".repeat(99));
                        for view in views {
                            println!("{:<66} {:>32}", view.hash, view.balance);
                        }
                    }
                }
            }

            Commands::Digest { account, amount } => {
                let account = Value::String(account);
                let amount = match serde_json::from_str::<Value>(&amount) {
                    Ok(number @ Value::Number(_)) => number,
                    _ => Value::String(amount),
                };
                println!("payload: {}", canonical_payload(&account, &amount));
                println!("hash:    {}", payload_digest(&account, &amount));
            }

            Commands::Journal { account, format } => {
                let service = LedgerService::init(&self.database, Vec::new()).await?;
                let entries = match account {
                    Some(account) => service.list_journal_for_account(&account).await?,
                    None => service.list_journal().await?,
                };

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                    OutputFormat::Table if entries.is_empty() => println!("No journal entries."),
                    OutputFormat::Table => {
                        println!(
                            "{:<20} {:<36} {:<24} {:>14}",
                            "RECORDED", "ID", "ACCOUNT", "AMOUNT"
                        );
                        println!("{}", "-".repeat(97));
                        for entry in entries {
                            println!(
                                "{:<20} {:<36} {:<24} {:>14}",
                                entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                                entry.id,
                                entry.account,
                                format_cents(entry.amount_cents.into())
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down...");
}
