//! Account domain model

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::AccountId;

/// A wallet/vault owned by the user.
///
/// `balance` always equals the opening balance plus the signed effect of every
/// transaction currently referencing this account; only transaction and
/// transfer operations move it. `account_type` is a freeform label joining to
/// an `AccountType` by label, not by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub color: String,
}

impl Account {
    /// Create an account with the required fields
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            card_number: None,
            card_holder: None,
            account_type: String::new(),
            color: String::new(),
        }
    }

    /// Materialize a guest-mode account from creation input: generated id,
    /// masked card number, and the guest holder label.
    pub fn from_new_guest(input: NewAccount) -> Self {
        let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
        Self {
            id: AccountId::generate(),
            name: input.name,
            balance: input.balance,
            card_number: Some(format!("**** **** **** {}", suffix)),
            card_holder: Some("GUEST USER".to_string()),
            account_type: input.account_type,
            color: input.color.unwrap_or_default(),
        }
    }
}

/// Input for creating an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub balance: Decimal,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewAccount {
    /// Validate creation input before any state changes
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("account name cannot be empty");
        }
        Ok(())
    }
}

/// Partial update of an account's non-balance fields.
///
/// Balance is deliberately absent: it is owned by transaction arithmetic and
/// is never patched directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
}

impl AccountPatch {
    /// Apply the given fields only, leaving the rest untouched
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(account_type) = &self.account_type {
            account.account_type = account_type.clone();
        }
        if let Some(color) = &self.color {
            account.color = color.clone();
        }
        if let Some(card_number) = &self.card_number {
            account.card_number = Some(card_number.clone());
        }
        if let Some(card_holder) = &self.card_holder {
            account.card_holder = Some(card_holder.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_validation() {
        let mut input = NewAccount {
            name: "Travel Fund".to_string(),
            balance: Decimal::new(50000, 2),
            account_type: "Savings".to_string(),
            color: None,
        };
        assert!(input.validate().is_ok());

        input.name = "   ".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_guest_account_gets_masked_card() {
        let account = Account::from_new_guest(NewAccount {
            name: "Travel Fund".to_string(),
            balance: Decimal::ZERO,
            account_type: "Savings".to_string(),
            color: None,
        });
        let card = account.card_number.unwrap();
        assert!(card.starts_with("**** **** **** "));
        assert_eq!(card.len(), 19);
        assert_eq!(account.card_holder.as_deref(), Some("GUEST USER"));
    }

    #[test]
    fn test_patch_leaves_balance_untouched() {
        let mut account = Account::new(AccountId::from("acc-1"), "Vault", Decimal::new(12345, 2));
        let patch = AccountPatch {
            name: Some("Renamed".to_string()),
            account_type: Some("Current".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut account);

        assert_eq!(account.name, "Renamed");
        assert_eq!(account.account_type, "Current");
        assert_eq!(account.balance, Decimal::new(12345, 2));
    }
}
