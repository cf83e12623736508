//! Transfer command - move funds between two vaults

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use citrus_core::TransferRequest;

use crate::output;

use super::{get_engine, parse_date, resolve_account};

pub async fn run(
    from: String,
    to: String,
    amount: Decimal,
    date: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut engine = get_engine().await?;
    let source_account_id = resolve_account(&engine, &from)?;
    let target_account_id = resolve_account(&engine, &to)?;

    // transfer failures surface to the user, unlike other mutations
    engine
        .transfer_funds(TransferRequest {
            source_account_id,
            target_account_id,
            amount,
            date: date.as_deref().map(parse_date).transpose()?.unwrap_or_else(Utc::now),
            description,
        })
        .await?;

    output::success(&format!(
        "Transferred {} from {} to {}",
        output::format_money(amount, engine.currency()),
        from,
        to
    ));
    Ok(())
}
