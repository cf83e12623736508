//! Citrus Core - client-side ledger engine for personal finance
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, Transaction, AccountType, Ledger)
//! - **ports**: Trait definitions for external dependencies (LedgerGateway)
//! - **services**: The finance engine and derived analytics
//! - **adapters**: Concrete implementations (HTTP gateway, demo gateway, guest vault)
//!
//! The engine owns the only authoritative copy of the ledger for the current
//! session. Anonymous sessions persist through the guest vault; authenticated
//! sessions mutate through the gateway and re-fetch, with the remote service
//! authoritative for balances. Concurrency model: single-threaded cooperative
//! execution, one mutation logically in flight; the busy flag is advisory and
//! the only hard guard is the one-sync-per-login-transition flag.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types at crate root
pub use adapters::demo::DemoGateway;
pub use adapters::guest_vault::{GuestRecord, GuestVault, DEFAULT_CURRENCY};
pub use adapters::http::HttpGateway;
pub use config::Config;
pub use domain::result::{Error, MutationOutcome, Result};
pub use domain::{
    Account, AccountId, AccountPatch, AccountType, AccountTypeId, Ledger, NewAccount,
    NewTransaction, Theme, Transaction, TransactionId, TransactionKind, TransactionPatch,
    UserProfile,
};
pub use ports::{LedgerGateway, TransferRequest};
pub use services::{DailyFlow, FinanceEngine, FinancialStats};
