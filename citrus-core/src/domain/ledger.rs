//! Ledger snapshot and built-in guest defaults
//!
//! The `Ledger` is the tuple (accounts, transactions, account types) the
//! engine owns for the active session. All three sequences are always
//! concrete; the type makes a partially-defined snapshot unrepresentable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::account_type::{AccountType, Theme};
use super::ids::{AccountId, TransactionId};
use super::transaction::Transaction;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub account_types: Vec<AccountType>,
}

impl Ledger {
    /// The initial guest-mode ledger: default vaults and types, no entries
    pub fn guest_defaults() -> Self {
        Self {
            accounts: default_accounts(),
            transactions: Vec::new(),
            account_types: default_account_types(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.transactions.is_empty() && self.account_types.is_empty()
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == *id)
    }

    pub fn account_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == *id)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == *id)
    }

    /// Apply a transaction's signed effect to its account's balance.
    /// Skips silently when the account is no longer present.
    pub fn apply_effect(&mut self, tx: &Transaction) {
        if let Some(account) = self.account_mut(&tx.account_id) {
            account.balance += tx.effect();
        }
    }

    /// Reverse a transaction's signed effect on its account's balance.
    /// Skips silently when the account is no longer present.
    pub fn revert_effect(&mut self, tx: &Transaction) {
        if let Some(account) = self.account_mut(&tx.account_id) {
            account.balance -= tx.effect();
        }
    }

    /// Remove an account and every transaction referencing it.
    /// Returns false when the account id does not resolve.
    pub fn remove_account_cascade(&mut self, id: &AccountId) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != *id);
        if self.accounts.len() == before {
            return false;
        }
        self.transactions.retain(|t| t.account_id != *id);
        true
    }
}

/// The four built-in guest vaults
pub fn default_accounts() -> Vec<Account> {
    let vault = |id: &str, name: &str, card: &str, account_type: &str, color: &str| Account {
        id: AccountId::from(id),
        name: name.to_string(),
        balance: Decimal::ZERO,
        card_number: Some(card.to_string()),
        card_holder: Some("CITRUS".to_string()),
        account_type: account_type.to_string(),
        color: color.to_string(),
    };

    vec![
        vault("acc-1", "Family Vault", "**** **** **** 1001", "Family", "indigo"),
        vault("acc-2", "Salary Account", "**** **** **** 2002", "Salary", "emerald"),
        vault("acc-3", "Current Account", "**** **** **** 3003", "Current", "blue"),
        vault("acc-4", "Savings Goal", "**** **** **** 4004", "Savings", "orange"),
    ]
}

/// The four built-in guest account types (immutable, guest mode only)
pub fn default_account_types() -> Vec<AccountType> {
    vec![
        AccountType {
            id: "type-1".into(),
            label: "Family".to_string(),
            theme: Theme::Indigo,
        },
        AccountType {
            id: "type-2".into(),
            label: "Salary".to_string(),
            theme: Theme::Emerald,
        },
        AccountType {
            id: "type-3".into(),
            label: "Current".to_string(),
            theme: Theme::Blue,
        },
        AccountType {
            id: "type-4".into(),
            label: "Savings".to_string(),
            theme: Theme::Orange,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{NewTransaction, TransactionKind};

    fn entry(account: &str, amount: i64, kind: TransactionKind) -> Transaction {
        Transaction::from_new_guest(NewTransaction {
            account_id: AccountId::from(account),
            amount: Decimal::new(amount, 2),
            kind,
            category: String::new(),
            description: String::new(),
            date: None,
        })
    }

    #[test]
    fn test_defaults_are_linked_by_label() {
        let ledger = Ledger::guest_defaults();
        assert_eq!(ledger.accounts.len(), 4);
        assert_eq!(ledger.account_types.len(), 4);
        for account in &ledger.accounts {
            assert!(ledger
                .account_types
                .iter()
                .any(|t| t.label == account.account_type));
        }
    }

    #[test]
    fn test_effects_round_trip() {
        let mut ledger = Ledger::guest_defaults();
        let tx = entry("acc-1", 2500, TransactionKind::Expense);

        ledger.apply_effect(&tx);
        assert_eq!(
            ledger.account(&"acc-1".into()).unwrap().balance,
            Decimal::new(-2500, 2)
        );

        ledger.revert_effect(&tx);
        assert_eq!(ledger.account(&"acc-1".into()).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_effect_on_missing_account_is_skipped() {
        let mut ledger = Ledger::default();
        let tx = entry("ghost", 1000, TransactionKind::Income);
        ledger.apply_effect(&tx);
        assert!(ledger.accounts.is_empty());
    }

    #[test]
    fn test_cascade_removes_only_matching_transactions() {
        let mut ledger = Ledger::guest_defaults();
        ledger.transactions.push(entry("acc-1", 100, TransactionKind::Income));
        ledger.transactions.push(entry("acc-2", 200, TransactionKind::Income));
        ledger.transactions.push(entry("acc-1", 300, TransactionKind::Expense));

        assert!(ledger.remove_account_cascade(&"acc-1".into()));

        assert_eq!(ledger.accounts.len(), 3);
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.transactions[0].account_id, AccountId::from("acc-2"));

        assert!(!ledger.remove_account_cascade(&"acc-1".into()));
    }
}
