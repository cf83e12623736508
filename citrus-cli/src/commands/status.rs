//! Status command - session mode and ledger summary

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::output;

use super::get_engine;

pub async fn run(json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let ledger = engine.ledger();
    let stats = engine.stats();

    let mode = match engine.current_user() {
        Some(user) => format!("Signed in as {}", user.name),
        None => "Guest (local data only)".to_string(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "mode": mode,
                "accounts": ledger.accounts.len(),
                "transactions": ledger.transactions.len(),
                "accountTypes": ledger.account_types.len(),
                "totalBalance": stats.total_balance,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Citrus Ledger Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Session", &mode]);
    table.add_row(vec!["Accounts", &ledger.accounts.len().to_string()]);
    table.add_row(vec!["Transactions", &ledger.transactions.len().to_string()]);
    table.add_row(vec!["Account types", &ledger.account_types.len().to_string()]);
    table.add_row(vec![
        "Total balance",
        &output::format_money(stats.total_balance, engine.currency()),
    ]);
    println!("{}", table);

    Ok(())
}
