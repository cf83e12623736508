//! Citrus CLI - personal finance in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, currency, demo, export, reset, stats, status, transactions, transfer, types};

/// Citrus - personal finance in your terminal
#[derive(Parser)]
#[command(name = "citrus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session mode and ledger summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage vaults
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountCommands,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        command: transactions::TxCommands,
    },

    /// Move funds between two vaults
    Transfer {
        /// Source account id or name
        #[arg(long)]
        from: String,
        /// Target account id or name
        #[arg(long)]
        to: String,
        /// Positive amount
        #[arg(long)]
        amount: Decimal,
        /// Date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Description for both entries
        #[arg(long)]
        description: Option<String>,
    },

    /// Manage account types
    Types {
        #[command(subcommand)]
        command: types::TypeCommands,
    },

    /// Show current-month income, expenses, and total balance
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the daily income/expense series
    Flows {
        /// Window length in days, ending today
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the transaction history as CSV
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Show or set the preferred currency symbol
    Currency {
        /// New symbol (omit to print the current one)
        symbol: Option<String>,
    },

    /// Erase all ledger data
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Accounts { command } => accounts::run(command).await,
        Commands::Tx { command } => transactions::run(command).await,
        Commands::Transfer {
            from,
            to,
            amount,
            date,
            description,
        } => transfer::run(from, to, amount, date, description).await,
        Commands::Types { command } => types::run(command).await,
        Commands::Stats { json } => stats::run(json).await,
        Commands::Flows { days, json } => stats::run_flows(days, json).await,
        Commands::Export { file } => export::run(&file).await,
        Commands::Currency { symbol } => currency::run(symbol).await,
        Commands::Reset { force } => reset::run(force).await,
        Commands::Demo { command } => demo::run(command),
    }
}
