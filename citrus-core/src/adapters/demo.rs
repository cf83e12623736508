//! Demo ledger gateway
//!
//! An in-memory stand-in for the remote finance service. Behaves like the
//! real backend: it assigns its own document ids (`srv-*`), is authoritative
//! for balances, and imports guest snapshots under fresh ids. An offline
//! switch turns every call into a gateway error, which is how tests and demo
//! sessions exercise the engine's failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AccountId, AccountPatch, AccountType, AccountTypeId, Ledger, NewAccount,
    NewTransaction, Theme, Transaction, TransactionId, TransactionKind, TransactionPatch,
    UserProfile, TRANSFER_CATEGORY,
};
use crate::ports::{LedgerGateway, TransferRequest};

struct DemoState {
    ledger: Ledger,
    next_id: u64,
}

impl DemoState {
    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("srv-{}-{}", prefix, self.next_id)
    }
}

/// In-memory remote service simulation
pub struct DemoGateway {
    state: Mutex<DemoState>,
    offline: AtomicBool,
    user: UserProfile,
}

impl DemoGateway {
    /// An empty demo service, as a fresh user account would see it
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DemoState {
                ledger: Ledger::default(),
                next_id: 0,
            }),
            offline: AtomicBool::new(false),
            user: UserProfile::new("u-demo", "demo@citrus.app", "Demo User"),
        }
    }

    /// A demo service pre-populated with a small realistic ledger
    pub fn seeded() -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock().unwrap();
            seed(&mut state);
        }
        gateway
    }

    /// Simulate losing the connection to the service
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::gateway("demo service offline"));
        }
        Ok(())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, DemoState> {
        self.state.lock().unwrap()
    }
}

impl Default for DemoGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(state: &mut DemoState) {
    let checking_id = AccountId::from(state.assign_id("acc"));
    let savings_id = AccountId::from(state.assign_id("acc"));
    let types = vec![
        AccountType {
            id: AccountTypeId::from(state.assign_id("type")),
            label: "Current".to_string(),
            theme: Theme::Blue,
        },
        AccountType {
            id: AccountTypeId::from(state.assign_id("type")),
            label: "Savings".to_string(),
            theme: Theme::Orange,
        },
    ];

    let mut checking = Account::new(checking_id.clone(), "Everyday Checking", Decimal::ZERO);
    checking.account_type = "Current".to_string();
    checking.card_number = Some("**** **** **** 4821".to_string());
    checking.card_holder = Some("DEMO USER".to_string());
    checking.color = "blue".to_string();

    let mut savings = Account::new(savings_id.clone(), "Rainy Day Fund", Decimal::new(120000, 2));
    savings.account_type = "Savings".to_string();
    savings.card_number = Some("**** **** **** 9377".to_string());
    savings.card_holder = Some("DEMO USER".to_string());
    savings.color = "orange".to_string();

    state.ledger = Ledger {
        accounts: vec![checking, savings],
        transactions: Vec::new(),
        account_types: types,
    };

    let now = Utc::now();
    let entries = [
        (&checking_id, 250000i64, TransactionKind::Income, "Salary", "Monthly salary", 6),
        (&checking_id, 4250, TransactionKind::Expense, "Food", "Groceries", 5),
        (&checking_id, 1600, TransactionKind::Expense, "Transport", "Metro card", 4),
        (&checking_id, 7800, TransactionKind::Expense, "Shopping", "Hardware store", 2),
        (&savings_id, 10000, TransactionKind::Income, "Investment", "Interest payout", 1),
    ];
    for (account_id, amount, kind, category, description, days_ago) in entries {
        let tx = Transaction {
            id: TransactionId::from(state.assign_id("tx")),
            account_id: (*account_id).clone(),
            amount: Decimal::new(amount, 2),
            kind,
            category: category.to_string(),
            description: description.to_string(),
            date: now - Duration::days(days_ago),
            balance_after: None,
            is_transfer: false,
        };
        state.ledger.apply_effect(&tx);
        state.ledger.transactions.insert(0, tx);
    }
}

#[async_trait]
impl LedgerGateway for DemoGateway {
    async fn fetch_current_user(&self) -> Result<Option<UserProfile>> {
        self.guard()?;
        Ok(Some(self.user.clone()))
    }

    async fn sync_guest_data(&self, guest: &Ledger) -> Result<()> {
        self.guard()?;
        let mut state = self.state();

        // Import under fresh server ids, remapping transaction references
        let mut account_ids: HashMap<AccountId, AccountId> = HashMap::new();
        for account in &guest.accounts {
            let server_id = AccountId::from(state.assign_id("acc"));
            account_ids.insert(account.id.clone(), server_id.clone());
            let mut imported = account.clone();
            imported.id = server_id;
            state.ledger.accounts.push(imported);
        }

        for tx in &guest.transactions {
            let Some(account_id) = account_ids.get(&tx.account_id) else {
                continue;
            };
            let mut imported = tx.clone();
            imported.id = TransactionId::from(state.assign_id("tx"));
            imported.account_id = account_id.clone();
            state.ledger.transactions.push(imported);
        }

        for account_type in &guest.account_types {
            let mut imported = account_type.clone();
            imported.id = AccountTypeId::from(state.assign_id("type"));
            state.ledger.account_types.push(imported);
        }

        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<Ledger> {
        self.guard()?;
        Ok(self.state().ledger.clone())
    }

    async fn create_account(&self, input: &NewAccount) -> Result<Account> {
        self.guard()?;
        let mut state = self.state();

        let mut account = Account::new(
            AccountId::from(state.assign_id("acc")),
            input.name.clone(),
            input.balance,
        );
        account.account_type = input.account_type.clone();
        account.color = input.color.clone().unwrap_or_default();
        account.card_holder = Some(self.user.name.to_uppercase());

        state.ledger.accounts.push(account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: &AccountId, patch: &AccountPatch) -> Result<Account> {
        self.guard()?;
        let mut state = self.state();
        let account = state
            .ledger
            .account_mut(id)
            .ok_or_else(|| Error::gateway("account not found"))?;
        patch.apply_to(account);
        Ok(account.clone())
    }

    async fn delete_account(&self, id: &AccountId) -> Result<()> {
        self.guard()?;
        self.state().ledger.remove_account_cascade(id);
        Ok(())
    }

    async fn create_transaction(&self, input: &NewTransaction) -> Result<Transaction> {
        self.guard()?;
        let mut state = self.state();
        if state.ledger.account(&input.account_id).is_none() {
            return Err(Error::gateway("account not found"));
        }

        let mut tx = Transaction::from_new_guest(input.clone());
        tx.id = TransactionId::from(state.assign_id("tx"));
        state.ledger.apply_effect(&tx);
        tx.balance_after = state.ledger.account(&tx.account_id).map(|a| a.balance);
        state.ledger.transactions.insert(0, tx.clone());
        Ok(tx)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction> {
        self.guard()?;
        let mut state = self.state();
        let old = state
            .ledger
            .transaction(id)
            .cloned()
            .ok_or_else(|| Error::gateway("transaction not found"))?;

        let updated = old.patched(patch);
        state.ledger.revert_effect(&old);
        state.ledger.apply_effect(&updated);
        if let Some(slot) = state.ledger.transactions.iter_mut().find(|t| t.id == *id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<()> {
        self.guard()?;
        let mut state = self.state();
        if let Some(tx) = state.ledger.transaction(id).cloned() {
            state.ledger.revert_effect(&tx);
            state.ledger.transactions.retain(|t| t.id != *id);
        }
        Ok(())
    }

    async fn bulk_delete_transactions(&self, ids: &[TransactionId]) -> Result<()> {
        self.guard()?;
        let mut state = self.state();
        let doomed: Vec<Transaction> = state
            .ledger
            .transactions
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect();
        for tx in &doomed {
            state.ledger.revert_effect(tx);
        }
        state.ledger.transactions.retain(|t| !ids.contains(&t.id));
        Ok(())
    }

    async fn delete_all_transactions(&self) -> Result<()> {
        self.guard()?;
        let mut state = self.state();
        let all: Vec<Transaction> = state.ledger.transactions.drain(..).collect();
        for tx in &all {
            state.ledger.revert_effect(tx);
        }
        Ok(())
    }

    async fn transfer_funds(&self, transfer: &TransferRequest) -> Result<()> {
        self.guard()?;
        let mut state = self.state();

        if transfer.amount <= Decimal::ZERO {
            return Err(Error::gateway("amount must be positive"));
        }
        if transfer.source_account_id == transfer.target_account_id {
            return Err(Error::gateway("cannot transfer to the same account"));
        }
        let source_name = state
            .ledger
            .account(&transfer.source_account_id)
            .map(|a| a.name.clone())
            .ok_or_else(|| Error::gateway("source account not found"))?;
        let target_name = state
            .ledger
            .account(&transfer.target_account_id)
            .map(|a| a.name.clone())
            .ok_or_else(|| Error::gateway("target account not found"))?;

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
                id: TransactionId::from(state.assign_id("tx")),
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
            state.ledger.apply_effect(&tx);
            state.ledger.transactions.insert(0, tx);
        }

        Ok(())
    }

    async fn create_account_type(&self, label: &str, theme: Theme) -> Result<AccountType> {
        self.guard()?;
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::gateway("label cannot be empty"));
        }
        let mut state = self.state();
        let account_type = AccountType {
            id: AccountTypeId::from(state.assign_id("type")),
            label: label.to_string(),
            theme,
        };
        state.ledger.account_types.push(account_type.clone());
        Ok(account_type)
    }

    async fn delete_account_type(&self, id: &AccountTypeId) -> Result<()> {
        self.guard()?;
        self.state().ledger.account_types.retain(|t| t.id != *id);
        Ok(())
    }

    async fn reset_all_data(&self) -> Result<()> {
        self.guard()?;
        self.state().ledger = Ledger::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_ledger_is_balanced() {
        let gateway = DemoGateway::seeded();
        let ledger = gateway.fetch_snapshot().await.unwrap();
        assert_eq!(ledger.accounts.len(), 2);
        assert!(!ledger.transactions.is_empty());

        // checking = sum of its entries, savings = opening + interest
        let checking = &ledger.accounts[0];
        let expected: Decimal = ledger
            .transactions
            .iter()
            .filter(|t| t.account_id == checking.id)
            .map(|t| t.effect())
            .sum();
        assert_eq!(checking.balance, expected);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let gateway = DemoGateway::new();
        gateway.set_offline(true);
        assert!(gateway.fetch_snapshot().await.is_err());
        assert!(gateway.fetch_current_user().await.is_err());
        gateway.set_offline(false);
        assert!(gateway.fetch_snapshot().await.is_ok());
    }

    #[tokio::test]
    async fn test_sync_assigns_server_ids() {
        let gateway = DemoGateway::new();
        let guest = Ledger::guest_defaults();
        gateway.sync_guest_data(&guest).await.unwrap();

        let ledger = gateway.fetch_snapshot().await.unwrap();
        assert_eq!(ledger.accounts.len(), 4);
        assert!(ledger
            .accounts
            .iter()
            .all(|a| a.id.as_str().starts_with("srv-acc-")));
    }
}
