//! Transaction domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, TransactionId};

/// Category label applied to the entries a transfer generates. Display only;
/// statistics exclusion keys off [`Transaction::is_transfer`].
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Direction of a ledger entry. Amounts are always positive; the kind alone
/// carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Signed value of `amount` under this direction
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A single signed ledger entry belonging to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    /// Balance of the account recorded right after this entry posted, when
    /// the backend supplies one
    #[serde(rename = "balanceAt", default, skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<Decimal>,
    /// Set on the entry pair a transfer generates; such entries are excluded
    /// from income/expense statistics
    #[serde(rename = "transfer", default)]
    pub is_transfer: bool,
}

impl Transaction {
    /// Materialize a guest-mode transaction from creation input: generated id,
    /// timestamp defaulting to now.
    pub fn from_new_guest(input: NewTransaction) -> Self {
        Self {
            id: TransactionId::generate(),
            account_id: input.account_id,
            amount: input.amount,
            kind: input.kind,
            category: input.category,
            description: input.description,
            date: input.date.unwrap_or_else(Utc::now),
            balance_after: None,
            is_transfer: false,
        }
    }

    /// Signed effect of this entry on its account's balance
    pub fn effect(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Copy of this entry with the patch's fields applied
    pub fn patched(&self, patch: &TransactionPatch) -> Self {
        let mut tx = self.clone();
        if let Some(account_id) = &patch.account_id {
            tx.account_id = account_id.clone();
        }
        if let Some(amount) = patch.amount {
            tx.amount = amount;
        }
        if let Some(kind) = patch.kind {
            tx.kind = kind;
        }
        if let Some(category) = &patch.category {
            tx.category = category.clone();
        }
        if let Some(description) = &patch.description {
            tx.description = description.clone();
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        tx
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Validate creation input before any state changes
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount <= Decimal::ZERO {
            return Err("amount must be positive");
        }
        Ok(())
    }
}

/// Partial update of a transaction. May move the entry to another account or
/// flip its direction; balance reconciliation is the engine's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    /// Validate patch input before any state changes
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err("amount must be positive");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::from_new_guest(NewTransaction {
            account_id: AccountId::from("acc-1"),
            amount: Decimal::new(4500, 2),
            kind: TransactionKind::Expense,
            category: "Food".to_string(),
            description: "Lunch".to_string(),
            date: None,
        })
    }

    #[test]
    fn test_signed_effect() {
        let mut tx = sample();
        assert_eq!(tx.effect(), Decimal::new(-4500, 2));
        tx.kind = TransactionKind::Income;
        assert_eq!(tx.effect(), Decimal::new(4500, 2));
    }

    #[test]
    fn test_validation_rejects_non_positive_amounts() {
        let mut input = NewTransaction {
            account_id: AccountId::from("acc-1"),
            amount: Decimal::ZERO,
            kind: TransactionKind::Income,
            category: String::new(),
            description: String::new(),
            date: None,
        };
        assert!(input.validate().is_err());
        input.amount = Decimal::new(-100, 2);
        assert!(input.validate().is_err());
        input.amount = Decimal::new(100, 2);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_patch_moves_entry_between_accounts() {
        let tx = sample();
        let patch = TransactionPatch {
            account_id: Some(AccountId::from("acc-2")),
            kind: Some(TransactionKind::Income),
            amount: Some(Decimal::new(3000, 2)),
            ..Default::default()
        };
        let updated = tx.patched(&patch);

        assert_eq!(updated.id, tx.id);
        assert_eq!(updated.account_id, AccountId::from("acc-2"));
        assert_eq!(updated.effect(), Decimal::new(3000, 2));
        // untouched fields survive
        assert_eq!(updated.category, "Food");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Expense).unwrap(),
            "\"expense\""
        );
    }
}
