//! Export command - write the transaction history as CSV

use std::path::Path;

use anyhow::{Context, Result};

use crate::output;

use super::get_engine;

pub async fn run(path: &Path) -> Result<()> {
    let engine = get_engine().await?;
    let ledger = engine.ledger();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record([
        "id",
        "date",
        "account",
        "kind",
        "amount",
        "category",
        "description",
        "transfer",
    ])?;

    for tx in &ledger.transactions {
        let account_name = ledger
            .account(&tx.account_id)
            .map(|a| a.name.as_str())
            .unwrap_or(tx.account_id.as_str());
        writer.write_record([
            tx.id.as_str(),
            &tx.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            account_name,
            tx.kind.as_str(),
            &tx.amount.to_string(),
            &tx.category,
            &tx.description,
            if tx.is_transfer { "true" } else { "false" },
        ])?;
    }
    writer.flush()?;

    output::success(&format!(
        "Exported {} transaction(s) to {:?}",
        ledger.transactions.len(),
        path
    ));
    Ok(())
}
