//! Account (vault) commands

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use citrus_core::{AccountPatch, NewAccount};

use crate::output;

use super::{get_engine, resolve_account};

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List all vaults
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a vault
    New {
        /// Display name
        name: String,
        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: Decimal,
        /// Account type label
        #[arg(long = "type", default_value = "")]
        account_type: String,
        /// Color tag
        #[arg(long)]
        color: Option<String>,
    },
    /// Edit a vault's name, type, or color
    Edit {
        /// Account id or name
        account: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        account_type: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a vault and every transaction in it
    Remove {
        /// Account id or name
        account: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::List { json } => list(json).await,
        AccountCommands::New {
            name,
            balance,
            account_type,
            color,
        } => new(name, balance, account_type, color).await,
        AccountCommands::Edit {
            account,
            name,
            account_type,
            color,
        } => edit(account, name, account_type, color).await,
        AccountCommands::Remove { account, force } => remove(account, force).await,
    }
}

async fn list(json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let ledger = engine.ledger();

    if json {
        println!("{}", serde_json::to_string_pretty(&ledger.accounts)?);
        return Ok(());
    }

    if ledger.accounts.is_empty() {
        output::info("No vaults yet. Create one with: citrus accounts new <name>");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Name", "Type", "Balance", "Card"]);
    for account in &ledger.accounts {
        table.add_row(vec![
            account.id.as_str(),
            &account.name,
            &account.account_type,
            &output::format_money(account.balance, engine.currency()),
            account.card_number.as_deref().unwrap_or("-"),
        ]);
    }
    println!("{}", table);
    Ok(())
}

async fn new(
    name: String,
    balance: Decimal,
    account_type: String,
    color: Option<String>,
) -> Result<()> {
    let mut engine = get_engine().await?;
    let outcome = engine
        .add_account(NewAccount {
            name,
            balance,
            account_type,
            color,
        })
        .await?;
    output::report_outcome(outcome, "Create vault");
    Ok(())
}

async fn edit(
    account: String,
    name: Option<String>,
    account_type: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let mut engine = get_engine().await?;
    let id = resolve_account(&engine, &account)?;
    let outcome = engine
        .update_account(
            &id,
            AccountPatch {
                name,
                account_type,
                color,
                ..Default::default()
            },
        )
        .await?;
    output::report_outcome(outcome, "Update vault");
    Ok(())
}

async fn remove(account: String, force: bool) -> Result<()> {
    let mut engine = get_engine().await?;
    let id = resolve_account(&engine, &account)?;
    let tx_count = engine
        .ledger()
        .transactions
        .iter()
        .filter(|t| t.account_id == id)
        .count();

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete this vault and its {} transaction(s)?",
                tx_count
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Aborted");
            return Ok(());
        }
    }

    let outcome = engine.delete_account(&id).await?;
    output::report_outcome(outcome, "Delete vault");
    Ok(())
}
