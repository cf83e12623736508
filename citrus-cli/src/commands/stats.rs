//! Stats and daily flow commands

use anyhow::Result;
use colored::Colorize;

use crate::output;

use super::get_engine;

pub async fn run(json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let stats = engine.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "This Month".bold());
    println!();

    let mut table = output::create_table();
    let symbol = engine.currency();
    table.add_row(vec![
        "Total balance",
        &output::format_money(stats.total_balance, symbol),
    ]);
    table.add_row(vec![
        "Income",
        &output::format_money(stats.monthly_income, symbol),
    ]);
    table.add_row(vec![
        "Expenses",
        &output::format_money(stats.monthly_expenses, symbol),
    ]);
    println!("{}", table);
    Ok(())
}

pub async fn run_flows(days: u32, json: bool) -> Result<()> {
    let engine = get_engine().await?;
    let flows = engine.daily_flows(days);

    if json {
        println!("{}", serde_json::to_string_pretty(&flows)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Income", "Expenses"]);
    let symbol = engine.currency();
    for flow in &flows {
        table.add_row(vec![
            &flow.date.format("%Y-%m-%d").to_string(),
            &output::format_money(flow.income, symbol),
            &output::format_money(flow.expenses, symbol),
        ]);
    }
    println!("{}", table);
    Ok(())
}
