//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod account_type;
mod ids;
pub mod ledger;
pub mod result;
mod transaction;
mod user;

pub use account::{Account, AccountPatch, NewAccount};
pub use account_type::{AccountType, Theme, BUILTIN_TYPE_IDS};
pub use ids::{AccountId, AccountTypeId, TransactionId};
pub use ledger::{default_account_types, default_accounts, Ledger};
pub use result::{Error, MutationOutcome, Result};
pub use transaction::{
    NewTransaction, Transaction, TransactionKind, TransactionPatch, TRANSFER_CATEGORY,
};
pub use user::UserProfile;
