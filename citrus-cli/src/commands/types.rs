//! Account type commands

use anyhow::{bail, Result};
use clap::Subcommand;

use citrus_core::{AccountTypeId, Theme};

use crate::output;

use super::get_engine;

#[derive(Subcommand)]
pub enum TypeCommands {
    /// List account types
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a custom account type
    New {
        /// Type label
        label: String,
        /// Theme: blue, emerald, orange, purple, rose, slate, indigo
        #[arg(long, default_value = "slate")]
        theme: String,
    },
    /// Delete a custom account type (built-ins are immutable)
    Remove {
        /// Type id
        id: String,
    },
}

pub async fn run(command: TypeCommands) -> Result<()> {
    match command {
        TypeCommands::List { json } => list(json).await,
        TypeCommands::New { label, theme } => new(label, theme).await,
        TypeCommands::Remove { id } => remove(id).await,
    }
}

async fn list(json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let types = &engine.ledger().account_types;

    if json {
        println!("{}", serde_json::to_string_pretty(types)?);
        return Ok(());
    }

    if types.is_empty() {
        output::info("No account types");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Label", "Theme"]);
    for account_type in types {
        table.add_row(vec![
            account_type.id.as_str(),
            &account_type.label,
            account_type.theme.as_str(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

async fn new(label: String, theme: String) -> Result<()> {
    let Some(theme) = Theme::parse(&theme) else {
        bail!("Unknown theme '{}'", theme);
    };
    let mut engine = get_engine().await?;
    let outcome = engine.add_account_type(&label, theme).await?;
    output::report_outcome(outcome, "Create account type");
    Ok(())
}

async fn remove(id: String) -> Result<()> {
    let mut engine = get_engine().await?;
    let outcome = engine.delete_account_type(&AccountTypeId::from(id)).await?;
    output::report_outcome(outcome, "Delete account type");
    Ok(())
}
