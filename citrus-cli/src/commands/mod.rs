//! CLI command implementations

pub mod accounts;
pub mod currency;
pub mod demo;
pub mod export;
pub mod reset;
pub mod stats;
pub mod status;
pub mod transactions;
pub mod transfer;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use citrus_core::adapters::http;
use citrus_core::{
    AccountId, Config, DemoGateway, FinanceEngine, GuestVault, HttpGateway, LedgerGateway,
    TransactionKind,
};

/// Get the citrus directory from environment or default
pub fn get_citrus_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CITRUS_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".citrus")
    }
}

/// Build the engine and feed it the current session signal.
///
/// Demo mode talks to the in-memory demo service as its demo user. Otherwise
/// a `CITRUS_TOKEN` in the environment selects the authenticated path against
/// the HTTP gateway; without one the session stays anonymous and all data
/// lives in the local guest store.
pub async fn get_engine() -> Result<FinanceEngine> {
    let citrus_dir = get_citrus_dir();
    std::fs::create_dir_all(&citrus_dir)
        .with_context(|| format!("Failed to create citrus directory: {:?}", citrus_dir))?;

    let config = Config::load(&citrus_dir).context("Failed to load settings")?;
    // demo sessions get their own store so they can never drain real guest data
    let vault = if config.demo_mode {
        GuestVault::new(citrus_dir.join("demo"))
    } else {
        GuestVault::new(&citrus_dir)
    };
    let token = std::env::var("CITRUS_TOKEN").ok();

    let gateway: Arc<dyn LedgerGateway> = if config.demo_mode {
        Arc::new(DemoGateway::seeded())
    } else if std::env::var(http::API_URL_ENV).is_err() {
        // settings may carry a base URL; the env var wins when present
        match &config.api_url {
            Some(url) => Arc::new(HttpGateway::with_base_url(url, token.as_deref())?),
            None => Arc::new(HttpGateway::new(token.as_deref())?),
        }
    } else {
        Arc::new(HttpGateway::new(token.as_deref())?)
    };

    let user = if config.demo_mode || token.is_some() {
        match gateway.fetch_current_user().await {
            Ok(user) => user,
            Err(e) => {
                crate::output::warning(&format!("Could not reach the service ({}), continuing as guest", e));
                None
            }
        }
    } else {
        None
    };

    let mut engine = FinanceEngine::new(gateway, vault);
    engine.set_session(user).await;
    Ok(engine)
}

/// Resolve an account by exact id or exact name
pub fn resolve_account(engine: &FinanceEngine, key: &str) -> Result<AccountId> {
    let ledger = engine.ledger();
    ledger
        .accounts
        .iter()
        .find(|a| a.id.as_str() == key || a.name == key)
        .map(|a| a.id.clone())
        .with_context(|| format!("No account matches '{}'", key))
}

/// Parse a transaction direction argument
pub fn parse_kind(s: &str) -> Result<TransactionKind> {
    match s.trim().to_lowercase().as_str() {
        "income" | "in" => Ok(TransactionKind::Income),
        "expense" | "out" => Ok(TransactionKind::Expense),
        other => anyhow::bail!("Unknown transaction kind '{}', expected income or expense", other),
    }
}

/// Parse a YYYY-MM-DD date argument into a UTC timestamp at midnight
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
    Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()))
}
