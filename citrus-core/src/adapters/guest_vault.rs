//! Persistent guest store
//!
//! Unauthenticated sessions keep their whole ledger in one serialized record
//! (`guest_data.json`) inside the citrus directory, plus a separate scalar
//! file for the preferred currency symbol, which persists independently of
//! login state. File access takes a flock so a second process cannot tear a
//! write in half.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{
    default_account_types, default_accounts, Account, AccountType, Ledger, Transaction,
};

const GUEST_DATA_FILE: &str = "guest_data.json";
const CURRENCY_FILE: &str = "currency";

/// Currency symbol used until the user picks one
pub const DEFAULT_CURRENCY: &str = "Rs.";

/// The serialized guest snapshot.
///
/// Sections are optional so a record written by an older build (or cleared by
/// a reset, which writes empty arrays) is distinguishable from one that never
/// contained the section: missing falls back to the built-in defaults, empty
/// stays empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<Account>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_types: Option<Vec<AccountType>>,
    /// When a login-time sync of this record last failed; the record is
    /// retained for retry on the next login transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_attempt: Option<DateTime<Utc>>,
}

impl GuestRecord {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            accounts: Some(ledger.accounts.clone()),
            transactions: Some(ledger.transactions.clone()),
            account_types: Some(ledger.account_types.clone()),
            last_sync_attempt: None,
        }
    }

    /// The snapshot with missing sections as empty sequences - the exact
    /// shape the sync operation posts to the gateway
    pub fn ledger_or_empty(&self) -> Ledger {
        Ledger {
            accounts: self.accounts.clone().unwrap_or_default(),
            transactions: self.transactions.clone().unwrap_or_default(),
            account_types: self.account_types.clone().unwrap_or_default(),
        }
    }

    /// The snapshot for a guest session: missing sections fall back to the
    /// built-in defaults, present-but-empty sections stay empty
    pub fn into_guest_ledger(self) -> Ledger {
        Ledger {
            accounts: self.accounts.unwrap_or_else(default_accounts),
            transactions: self.transactions.unwrap_or_default(),
            account_types: self.account_types.unwrap_or_else(default_account_types),
        }
    }

    /// True when there is nothing worth syncing to the remote service
    pub fn is_empty(&self) -> bool {
        self.accounts.as_deref().unwrap_or_default().is_empty()
            && self.transactions.as_deref().unwrap_or_default().is_empty()
            && self.account_types.as_deref().unwrap_or_default().is_empty()
    }
}

/// File-backed guest store rooted at the citrus directory
#[derive(Debug, Clone)]
pub struct GuestVault {
    dir: PathBuf,
}

impl GuestVault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn data_path(&self) -> PathBuf {
        self.dir.join(GUEST_DATA_FILE)
    }

    fn currency_path(&self) -> PathBuf {
        self.dir.join(CURRENCY_FILE)
    }

    /// Read the stored guest record, `None` when nothing was ever saved
    pub fn load(&self) -> Result<Option<GuestRecord>> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;
        let record = serde_json::from_reader(&file);
        let _ = file.unlock();

        Ok(Some(record?))
    }

    /// Write the guest record, replacing any previous one
    pub fn save(&self, record: &GuestRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(self.data_path())?;
        file.lock_exclusive()?;
        file.set_len(0)?;
        let result = serde_json::to_writer_pretty(&file, record);
        let _ = file.unlock();

        result?;
        Ok(())
    }

    /// Drop the stored guest record (after a successful login sync)
    pub fn clear(&self) -> Result<()> {
        let path = self.data_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Record a failed login-time sync on the retained snapshot
    pub fn stamp_sync_attempt(&self, at: DateTime<Utc>) -> Result<()> {
        if let Some(mut record) = self.load()? {
            record.last_sync_attempt = Some(at);
            self.save(&record)?;
        }
        Ok(())
    }

    /// The persisted currency symbol, independent of login state
    pub fn load_currency(&self) -> String {
        match fs::read_to_string(self.currency_path()) {
            Ok(symbol) if !symbol.trim().is_empty() => symbol.trim().to_string(),
            _ => DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn save_currency(&self, symbol: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.currency_path(), symbol)?;
        Ok(())
    }
}
