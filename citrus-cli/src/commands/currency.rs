//! Currency command - show or set the preferred currency symbol

use anyhow::Result;

use crate::output;

use super::get_engine;

pub async fn run(symbol: Option<String>) -> Result<()> {
    let mut engine = get_engine().await?;

    match symbol {
        Some(symbol) => {
            engine.set_currency(symbol.clone());
            output::success(&format!("Currency symbol set to {}", symbol));
        }
        None => println!("{}", engine.currency()),
    }
    Ok(())
}
