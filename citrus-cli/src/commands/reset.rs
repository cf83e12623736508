//! Reset command - clear all ledger data

use anyhow::Result;
use dialoguer::Confirm;

use crate::output;

use super::get_engine;

pub async fn run(force: bool) -> Result<()> {
    let mut engine = get_engine().await?;

    if !force {
        let target = match engine.current_user() {
            Some(user) => format!("ALL data for {}", user.name),
            None => "ALL local guest data".to_string(),
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("This erases {}. Continue?", target))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Aborted");
            return Ok(());
        }
    }

    let outcome = engine.reset_all_data().await?;
    output::report_outcome(outcome, "Reset");
    Ok(())
}
