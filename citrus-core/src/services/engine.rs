//! Finance engine - the authoritative owner of the ledger snapshot
//!
//! One engine exists per process. It holds the only mutable copy of the
//! ledger, runs every mutation, and picks the execution path per operation
//! from the current session signal: guest operations mutate the snapshot
//! in place and persist it to the guest vault; authenticated operations call
//! the remote gateway and then re-fetch the full snapshot, since the service
//! is authoritative for balance state. Readers only ever observe a snapshot
//! with every mutation's balance adjustments completed.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::adapters::guest_vault::{GuestRecord, GuestVault};
use crate::domain::result::{Error, MutationOutcome, Result};
use crate::domain::{
    Account, AccountId, AccountPatch, AccountType, AccountTypeId, Ledger, NewAccount,
    NewTransaction, Theme, Transaction, TransactionId, TransactionKind, TransactionPatch,
    UserProfile, TRANSFER_CATEGORY,
};
use crate::ports::{LedgerGateway, TransferRequest};
use crate::services::analytics::{self, DailyFlow, FinancialStats};

pub struct FinanceEngine {
    gateway: Arc<dyn LedgerGateway>,
    vault: GuestVault,
    ledger: Ledger,
    currency: String,
    session: Option<UserProfile>,
    prev_user: Option<String>,
    /// At most one guest-data sync may run per login transition
    syncing: bool,
    /// Advisory only; nothing is locked (see crate docs on concurrency)
    busy: bool,
}

impl FinanceEngine {
    pub fn new(gateway: Arc<dyn LedgerGateway>, vault: GuestVault) -> Self {
        let currency = vault.load_currency();
        Self {
            gateway,
            vault,
            ledger: Ledger::default(),
            currency,
            session: None,
            prev_user: None,
            syncing: false,
            busy: false,
        }
    }

    // === Read access ===

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Advisory busy flag callers may use to disable concurrent inputs
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Headline stats for the current calendar month
    pub fn stats(&self) -> FinancialStats {
        analytics::snapshot_stats(&self.ledger, Utc::now())
    }

    /// Daily income/expense series for the window ending today
    pub fn daily_flows(&self, days: u32) -> Vec<DailyFlow> {
        analytics::daily_flows(&self.ledger, days, Utc::now().date_naive())
    }

    // === Session transitions ===

    /// Feed a session signal change into the engine.
    ///
    /// Every path ends in a defined state: each of accounts, transactions,
    /// and account types is a concrete (possibly empty) sequence. Failures
    /// along the way are logged and degrade to last-known-good or defaults,
    /// never to a partial snapshot.
    pub async fn set_session(&mut self, user: Option<UserProfile>) {
        self.busy = true;
        match &user {
            // fresh login: push any guest data up, then adopt the remote state
            Some(_) if self.prev_user.is_none() => self.login_transition().await,
            // still signed in: the remote snapshot may have moved
            Some(_) => self.refresh().await,
            None => self.load_guest(),
        }
        self.prev_user = user.as_ref().map(|u| u.id.clone());
        self.session = user;
        self.busy = false;
    }

    async fn login_transition(&mut self) {
        if self.syncing {
            return;
        }
        self.syncing = true;

        let record = match self.vault.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "guest store unreadable, skipping sync");
                None
            }
        };

        match record {
            Some(record) if !record.is_empty() => {
                match self.gateway.sync_guest_data(&record.ledger_or_empty()).await {
                    Ok(()) => {
                        debug!("guest data synced to remote service");
                        if let Err(e) = self.vault.clear() {
                            warn!(error = %e, "failed to clear guest store after sync");
                        }
                    }
                    Err(e) => {
                        // keep the snapshot so the next login can retry
                        warn!(error = %e, "guest data sync failed, retaining local snapshot");
                        if let Err(e) = self.vault.stamp_sync_attempt(Utc::now()) {
                            warn!(error = %e, "failed to stamp sync attempt");
                        }
                    }
                }
                // sync failure must not block reaching a usable state
                self.refresh().await;
            }
            _ => self.refresh().await,
        }

        self.syncing = false;
    }

    /// Replace the in-memory snapshot wholesale with the gateway's current
    /// state. No client-side merge happens here: once authenticated, the
    /// remote service is the sole source of truth.
    pub async fn refresh(&mut self) {
        match self.gateway.fetch_snapshot().await {
            Ok(snapshot) => self.ledger = snapshot,
            Err(e) => warn!(error = %e, "snapshot fetch failed, keeping last known state"),
        }
    }

    fn load_guest(&mut self) {
        self.ledger = match self.vault.load() {
            Ok(Some(record)) => record.into_guest_ledger(),
            Ok(None) => Ledger::guest_defaults(),
            Err(e) => {
                warn!(error = %e, "guest store unreadable, starting from defaults");
                Ledger::guest_defaults()
            }
        };
    }

    /// Fire-and-forget write-through of the guest snapshot; never runs while
    /// authenticated, never fails the calling mutation
    fn persist_guest(&self) {
        if self.session.is_some() || self.syncing {
            return;
        }
        if let Err(e) = self.vault.save(&GuestRecord::from_ledger(&self.ledger)) {
            warn!(error = %e, "guest store write failed");
        }
    }

    // === Accounts ===

    pub async fn add_account(&mut self, input: NewAccount) -> Result<MutationOutcome> {
        input.validate().map_err(Error::validation)?;
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.create_account(&input).await {
                Ok(_) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "add account failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            self.ledger.accounts.push(Account::from_new_guest(input));
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    pub async fn update_account(
        &mut self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.update_account(id, &patch).await {
                Ok(_) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "update account failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            match self.ledger.account_mut(id) {
                Some(account) => {
                    patch.apply_to(account);
                    self.persist_guest();
                    MutationOutcome::Applied
                }
                None => MutationOutcome::NotFound,
            }
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Delete an account and cascade to every transaction referencing it
    pub async fn delete_account(&mut self, id: &AccountId) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.delete_account(id).await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "delete account failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else if self.ledger.remove_account_cascade(id) {
            self.persist_guest();
            MutationOutcome::Applied
        } else {
            MutationOutcome::NotFound
        };
        self.busy = false;
        Ok(outcome)
    }

    // === Transactions ===

    pub async fn add_transaction(&mut self, input: NewTransaction) -> Result<MutationOutcome> {
        input.validate().map_err(Error::validation)?;
        if !self.is_authenticated() && self.ledger.account(&input.account_id).is_none() {
            return Err(Error::validation("transaction references an unknown account"));
        }

        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.create_transaction(&input).await {
                Ok(_) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "add transaction failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            let tx = Transaction::from_new_guest(input);
            self.ledger.apply_effect(&tx);
            self.ledger.transactions.insert(0, tx);
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Reverse the old entry's effect on its old account, apply the new
    /// entry's effect on its (possibly different) new account, then replace
    /// the record - in that order, so balances stay consistent even when the
    /// edit moves the entry or flips its direction.
    pub async fn update_transaction(
        &mut self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<MutationOutcome> {
        patch.validate().map_err(Error::validation)?;
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.update_transaction(id, &patch).await {
                Ok(_) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "update transaction failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            match self.ledger.transaction(id).cloned() {
                Some(old) => {
                    let updated = old.patched(&patch);
                    self.ledger.revert_effect(&old);
                    self.ledger.apply_effect(&updated);
                    if let Some(slot) = self.ledger.transactions.iter_mut().find(|t| t.id == *id)
                    {
                        *slot = updated;
                    }
                    self.persist_guest();
                    MutationOutcome::Applied
                }
                None => MutationOutcome::NotFound,
            }
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Reverse the entry's balance effect before removing it
    pub async fn delete_transaction(&mut self, id: &TransactionId) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.delete_transaction(id).await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "delete transaction failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            match self.ledger.transaction(id).cloned() {
                Some(tx) => {
                    self.ledger.revert_effect(&tx);
                    self.ledger.transactions.retain(|t| t.id != *id);
                    self.persist_guest();
                    MutationOutcome::Applied
                }
                None => MutationOutcome::NotFound,
            }
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Delete a set of transactions. The result is the same as deleting each
    /// one individually, in any order.
    pub async fn bulk_delete_transactions(
        &mut self,
        ids: &[TransactionId],
    ) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.bulk_delete_transactions(ids).await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "bulk delete failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            let doomed: Vec<Transaction> = self
                .ledger
                .transactions
                .iter()
                .filter(|t| ids.contains(&t.id))
                .cloned()
                .collect();
            for tx in &doomed {
                self.ledger.revert_effect(tx);
            }
            self.ledger.transactions.retain(|t| !ids.contains(&t.id));
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Reverse every entry's effect, then clear the ledger of transactions
    pub async fn delete_all_transactions(&mut self) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.delete_all_transactions().await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "delete all transactions failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            let all: Vec<Transaction> = self.ledger.transactions.drain(..).collect();
            for tx in &all {
                self.ledger.revert_effect(tx);
            }
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    // === Transfers ===

    /// Move funds between two vaults: one expense entry on the source, one
    /// income entry on the target, both flagged as transfer entries.
    ///
    /// Unlike every other mutation this re-raises gateway failures, because
    /// callers show a user-facing failure state for transfers specifically.
    pub async fn transfer_funds(&mut self, transfer: TransferRequest) -> Result<()> {
        if transfer.amount <= Decimal::ZERO {
            return Err(Error::validation("amount must be positive"));
        }
        if transfer.source_account_id == transfer.target_account_id {
            return Err(Error::validation("cannot transfer to the same account"));
        }

        if self.is_authenticated() {
            self.busy = true;
            let result = self.gateway.transfer_funds(&transfer).await;
            match result {
                Ok(()) => {
                    self.refresh().await;
                    self.busy = false;
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, "transfer failed");
                    self.busy = false;
                    Err(e)
                }
            }
        } else {
            let source_name = self
                .ledger
                .account(&transfer.source_account_id)
                .map(|a| a.name.clone())
                .ok_or_else(|| Error::validation("source account not found"))?;
            let target_name = self
                .ledger
                .account(&transfer.target_account_id)
                .map(|a| a.name.clone())
                .ok_or_else(|| Error::validation("target account not found"))?;

            self.busy = true;
            let pair = [
                (
                    transfer.source_account_id.clone(),
                    TransactionKind::Expense,
                    format!("Transfer to {}", target_name),
                ),
                (
                    transfer.target_account_id.clone(),
                    TransactionKind::Income,
                    format!("Transfer from {}", source_name),
                ),
            ];
            for (account_id, kind, default_description) in pair {
                let tx = Transaction {
                    id: TransactionId::generate(),
                    account_id,
                    amount: transfer.amount,
                    kind,
                    category: TRANSFER_CATEGORY.to_string(),
                    description: transfer
                        .description
                        .clone()
                        .unwrap_or(default_description),
                    date: transfer.date,
                    balance_after: None,
                    is_transfer: true,
                };
                self.ledger.apply_effect(&tx);
                self.ledger.transactions.insert(0, tx);
            }
            self.persist_guest();
            self.busy = false;
            Ok(())
        }
    }

    // === Account types ===

    pub async fn add_account_type(
        &mut self,
        label: &str,
        theme: Theme,
    ) -> Result<MutationOutcome> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::validation("label cannot be empty"));
        }

        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.create_account_type(label, theme).await {
                Ok(_) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "add account type failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            self.ledger
                .account_types
                .push(AccountType::new(label, theme));
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    /// Built-in types are immutable; deleting one is a no-op
    pub async fn delete_account_type(&mut self, id: &AccountTypeId) -> Result<MutationOutcome> {
        if AccountType::is_builtin(id) {
            return Ok(MutationOutcome::Rejected);
        }

        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.delete_account_type(id).await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "delete account type failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            let before = self.ledger.account_types.len();
            self.ledger.account_types.retain(|t| t.id != *id);
            if self.ledger.account_types.len() == before {
                MutationOutcome::NotFound
            } else {
                self.persist_guest();
                MutationOutcome::Applied
            }
        };
        self.busy = false;
        Ok(outcome)
    }

    // === Maintenance ===

    /// Clear everything. Guest mode clears to empty, not back to defaults.
    pub async fn reset_all_data(&mut self) -> Result<MutationOutcome> {
        self.busy = true;
        let outcome = if self.is_authenticated() {
            match self.gateway.reset_all_data().await {
                Ok(()) => {
                    self.refresh().await;
                    MutationOutcome::Applied
                }
                Err(e) => {
                    warn!(error = %e, "reset failed");
                    MutationOutcome::RemoteFailed
                }
            }
        } else {
            self.ledger = Ledger::default();
            self.persist_guest();
            MutationOutcome::Applied
        };
        self.busy = false;
        Ok(outcome)
    }

    // === Currency preference ===

    /// Persisted independently of login state
    pub fn set_currency(&mut self, symbol: impl Into<String>) {
        self.currency = symbol.into();
        if let Err(e) = self.vault.save_currency(&self.currency) {
            warn!(error = %e, "failed to persist currency preference");
        }
    }
}
