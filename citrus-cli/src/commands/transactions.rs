//! Transaction commands

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use citrus_core::{NewTransaction, TransactionId, TransactionPatch};

use crate::output;

use super::{get_engine, parse_date, parse_kind, resolve_account};

#[derive(Subcommand)]
pub enum TxCommands {
    /// List transactions, newest first
    List {
        /// Only entries for this account id or name
        #[arg(long)]
        account: Option<String>,
        /// Show at most this many entries
        #[arg(long, default_value_t = 25)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a transaction
    New {
        /// Account id or name
        #[arg(long)]
        account: String,
        /// Positive amount
        #[arg(long)]
        amount: Decimal,
        /// income or expense
        #[arg(long)]
        kind: String,
        /// Category label
        #[arg(long, default_value = "Other")]
        category: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
        /// Date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a transaction; balances are reconciled automatically
    Edit {
        /// Transaction id
        id: String,
        /// Move the entry to this account id or name
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        /// income or expense
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete one or more transactions, reversing their balance effects
    Remove {
        /// Transaction ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every transaction
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: TxCommands) -> Result<()> {
    match command {
        TxCommands::List {
            account,
            limit,
            json,
        } => list(account, limit, json).await,
        TxCommands::New {
            account,
            amount,
            kind,
            category,
            description,
            date,
        } => new(account, amount, kind, category, description, date).await,
        TxCommands::Edit {
            id,
            account,
            amount,
            kind,
            category,
            description,
            date,
        } => edit(id, account, amount, kind, category, description, date).await,
        TxCommands::Remove { ids } => remove(ids).await,
        TxCommands::Clear { force } => clear(force).await,
    }
}

async fn list(account: Option<String>, limit: usize, json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let account_id = account
        .map(|key| resolve_account(&engine, &key))
        .transpose()?;

    let entries: Vec<_> = engine
        .ledger()
        .transactions
        .iter()
        .filter(|t| account_id.as_ref().map_or(true, |id| t.account_id == *id))
        .take(limit)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No transactions");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Date", "Account", "Kind", "Amount", "Category", "Description"]);
    for tx in entries {
        let account_name = engine
            .ledger()
            .account(&tx.account_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| tx.account_id.to_string());
        table.add_row(vec![
            tx.id.as_str(),
            &tx.date.format("%Y-%m-%d").to_string(),
            &account_name,
            tx.kind.as_str(),
            &output::format_money(tx.amount, engine.currency()),
            &tx.category,
            &tx.description,
        ]);
    }
    println!("{}", table);
    Ok(())
}

async fn new(
    account: String,
    amount: Decimal,
    kind: String,
    category: String,
    description: String,
    date: Option<String>,
) -> Result<()> {
    let mut engine = get_engine().await?;
    let account_id = resolve_account(&engine, &account)?;
    let outcome = engine
        .add_transaction(NewTransaction {
            account_id,
            amount,
            kind: parse_kind(&kind)?,
            category,
            description,
            date: date.as_deref().map(parse_date).transpose()?,
        })
        .await?;
    output::report_outcome(outcome, "Record transaction");
    Ok(())
}

async fn edit(
    id: String,
    account: Option<String>,
    amount: Option<Decimal>,
    kind: Option<String>,
    category: Option<String>,
    description: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let mut engine = get_engine().await?;
    let account_id = account
        .map(|key| resolve_account(&engine, &key))
        .transpose()?;
    let outcome = engine
        .update_transaction(
            &TransactionId::from(id),
            TransactionPatch {
                account_id,
                amount,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category,
                description,
                date: date.as_deref().map(parse_date).transpose()?,
            },
        )
        .await?;
    output::report_outcome(outcome, "Update transaction");
    Ok(())
}

async fn remove(ids: Vec<String>) -> Result<()> {
    let mut engine = get_engine().await?;
    let ids: Vec<TransactionId> = ids.into_iter().map(TransactionId::from).collect();

    let outcome = if ids.len() == 1 {
        engine.delete_transaction(&ids[0]).await?
    } else {
        engine.bulk_delete_transactions(&ids).await?
    };
    output::report_outcome(outcome, "Delete transaction(s)");
    Ok(())
}

async fn clear(force: bool) -> Result<()> {
    let mut engine = get_engine().await?;
    let count = engine.ledger().transactions.len();

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all {} transaction(s)?", count))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Aborted");
            return Ok(());
        }
    }

    let outcome = engine.delete_all_transactions().await?;
    output::report_outcome(outcome, "Clear transactions");
    Ok(())
}
