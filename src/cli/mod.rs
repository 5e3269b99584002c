use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::api::{Dispatcher, http};
use crate::application::LedgerService;
use crate::domain::{AccountType, monthly_interest};
use crate::storage::AccountRegistry;

pub mod logging;

/// Bankledger - in-memory banking ledger over HTTP
#[derive(Parser)]
#[command(name = "bankledger")]
#[command(about = "An in-memory banking ledger served over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Print the monthly interest an account would earn
    Interest {
        /// Account type (SAVINGS, CHECKING, anything else earns nothing)
        #[arg(long = "type")]
        account_type: String,

        /// Current balance (e.g., "1200" or "800.50")
        balance: String,
    },
}

/// Server configuration. Every flag can also be set from the environment.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BANKLEDGER_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, env = "BANKLEDGER_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "BANKLEDGER_JSON_LOGS")]
    pub json_logs: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve(args).await,

            Commands::Interest {
                account_type,
                balance,
            } => {
                let balance: Decimal = balance.trim().parse().with_context(|| {
                    format!("Invalid balance '{}'. Use '1200' or '800.50'", balance)
                })?;
                let account_type = AccountType::from(account_type);
                let interest = monthly_interest(&account_type, balance);
                println!(
                    "{} at {}% per year on {}: {} per month",
                    account_type,
                    account_type.annual_rate() * Decimal::ONE_HUNDRED,
                    balance,
                    interest.round_dp(2)
                );
                Ok(())
            }
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    logging::init(&args.log_level, args.json_logs);

    let service = Arc::new(LedgerService::new(AccountRegistry::new()));
    let dispatcher = Dispatcher::new(service);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    http::serve(listener, dispatcher).await
}
