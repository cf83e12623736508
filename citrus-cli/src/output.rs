//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

use citrus_core::MutationOutcome;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount with the user's currency symbol
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", symbol, amount)
}

/// Report a mutation outcome in one line
pub fn report_outcome(outcome: MutationOutcome, what: &str) {
    match outcome {
        MutationOutcome::Applied => success(&format!("{} done", what)),
        MutationOutcome::NotFound => warning(&format!("{}: target not found, nothing changed", what)),
        MutationOutcome::Rejected => {
            warning(&format!("{}: built-in entries cannot be changed", what))
        }
        MutationOutcome::RemoteFailed => {
            error(&format!("{}: the service could not be reached", what))
        }
    }
}
