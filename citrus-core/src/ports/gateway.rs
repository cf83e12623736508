//! Remote ledger gateway port
//!
//! Defines the contract the engine holds against the remote finance service.
//! Implementations (adapters) own the wire format and transport; everything
//! here speaks domain types. Timeouts and retry policy, if any, also live in
//! the adapters - the engine never retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{
    Account, AccountId, AccountPatch, AccountType, AccountTypeId, Ledger, NewAccount,
    NewTransaction, Theme, Transaction, TransactionId, TransactionPatch, UserProfile,
};

/// A funds transfer between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_account_id: AccountId,
    pub target_account_id: AccountId,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Remote ledger service abstraction
///
/// The service is authoritative for balance state in authenticated mode: the
/// engine never does balance arithmetic through this trait, it mutates and
/// then re-fetches the full snapshot.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    // === Session ===

    /// Resolve the current session identity, `None` when anonymous
    async fn fetch_current_user(&self) -> Result<Option<UserProfile>>;

    // === Sync ===

    /// Import a guest-mode snapshot into the authenticated user's data
    async fn sync_guest_data(&self, guest: &Ledger) -> Result<()>;

    /// Fetch the full authoritative snapshot
    async fn fetch_snapshot(&self) -> Result<Ledger>;

    // === Accounts ===

    async fn create_account(&self, input: &NewAccount) -> Result<Account>;

    async fn update_account(&self, id: &AccountId, patch: &AccountPatch) -> Result<Account>;

    /// Delete an account; the service cascades to its transactions
    async fn delete_account(&self, id: &AccountId) -> Result<()>;

    // === Transactions ===

    async fn create_transaction(&self, input: &NewTransaction) -> Result<Transaction>;

    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, id: &TransactionId) -> Result<()>;

    async fn bulk_delete_transactions(&self, ids: &[TransactionId]) -> Result<()>;

    async fn delete_all_transactions(&self) -> Result<()>;

    /// Move funds between two accounts, creating the linked entry pair
    async fn transfer_funds(&self, transfer: &TransferRequest) -> Result<()>;

    // === Account types ===

    async fn create_account_type(&self, label: &str, theme: Theme) -> Result<AccountType>;

    async fn delete_account_type(&self, id: &AccountTypeId) -> Result<()>;

    // === Maintenance ===

    /// Clear all of the user's data on the service
    async fn reset_all_data(&self) -> Result<()>;
}
