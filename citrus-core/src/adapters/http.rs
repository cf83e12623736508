//! Citrus API client
//!
//! Implements the ledger gateway against the Citrus REST service. All wire
//! concerns live here: endpoint paths, bearer auth, and the dual-identity
//! normalization of server payloads (documents may carry a server `_id`, a
//! client `id`, or both - one canonical id leaves this module).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AccountId, AccountPatch, AccountType, AccountTypeId, Ledger, NewAccount,
    NewTransaction, Theme, Transaction, TransactionId, TransactionKind, TransactionPatch,
    UserProfile,
};
use crate::ports::{LedgerGateway, TransferRequest};

/// Default development API URL
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "CITRUS_API_URL";

/// Get the API base URL, checking the environment variable first
pub fn base_url() -> String {
    std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

// =============================================================================
// Wire models (matching the Citrus API payloads)
// =============================================================================

/// Resolve the canonical id from a server `_id` / client `id` pair
fn resolve_id(server_id: Option<String>, id: Option<String>, entity: &str) -> Result<String> {
    server_id
        .or(id)
        .ok_or_else(|| Error::gateway(format!("{} document missing id", entity)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    #[serde(rename = "_id", default)]
    server_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    balance: Decimal,
    #[serde(default)]
    card_number: Option<String>,
    #[serde(default)]
    card_holder: Option<String>,
    #[serde(rename = "type", default)]
    account_type: String,
    #[serde(default)]
    color: String,
}

impl WireAccount {
    fn into_domain(self) -> Result<Account> {
        Ok(Account {
            id: AccountId::from(resolve_id(self.server_id, self.id, "account")?),
            name: self.name,
            balance: self.balance,
            card_number: self.card_number,
            card_holder: self.card_holder,
            account_type: self.account_type,
            color: self.color,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    #[serde(rename = "_id", default)]
    server_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    account_id: String,
    amount: Decimal,
    #[serde(rename = "type")]
    kind: TransactionKind,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    date: DateTime<Utc>,
    #[serde(rename = "balanceAt", default)]
    balance_after: Option<Decimal>,
    #[serde(rename = "transfer", default)]
    is_transfer: bool,
}

impl WireTransaction {
    fn into_domain(self) -> Result<Transaction> {
        Ok(Transaction {
            id: TransactionId::from(resolve_id(self.server_id, self.id, "transaction")?),
            account_id: AccountId::from(self.account_id),
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            description: self.description,
            date: self.date,
            balance_after: self.balance_after,
            is_transfer: self.is_transfer,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireAccountType {
    #[serde(rename = "_id", default)]
    server_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    label: String,
    theme: Theme,
}

impl WireAccountType {
    fn into_domain(self) -> Result<AccountType> {
        Ok(AccountType {
            id: AccountTypeId::from(resolve_id(self.server_id, self.id, "account type")?),
            label: self.label,
            theme: self.theme,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    #[serde(default)]
    accounts: Vec<WireAccount>,
    #[serde(default)]
    transactions: Vec<WireTransaction>,
    #[serde(default)]
    account_types: Vec<WireAccountType>,
}

impl WireSnapshot {
    fn into_domain(self) -> Result<Ledger> {
        Ok(Ledger {
            accounts: self
                .accounts
                .into_iter()
                .map(WireAccount::into_domain)
                .collect::<Result<_>>()?,
            transactions: self
                .transactions
                .into_iter()
                .map(WireTransaction::into_domain)
                .collect::<Result<_>>()?,
            account_types: self
                .account_types
                .into_iter()
                .map(WireAccountType::into_domain)
                .collect::<Result<_>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(rename = "_id", default)]
    server_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    email: String,
    name: String,
}

impl WireUser {
    fn into_domain(self) -> Result<UserProfile> {
        Ok(UserProfile {
            id: resolve_id(self.server_id, self.id, "user")?,
            email: self.email,
            name: self.name,
        })
    }
}

// =============================================================================
// HTTP gateway
// =============================================================================

/// Ledger gateway over the Citrus REST API
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    /// Create a gateway against the configured base URL.
    ///
    /// `token` is the opaque session token; requests without one will be
    /// rejected by the service for everything but `fetch_current_user`.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(&base_url(), token)
    }

    /// Create a gateway against a specific base URL
    pub fn with_base_url(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::gateway(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::gateway(format!("{}: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::gateway(format!("{}: HTTP {}", path, status)));
        }
        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
        path: &str,
    ) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::gateway(format!("{}: invalid response: {}", path, e)))
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    async fn fetch_current_user(&self) -> Result<Option<UserProfile>> {
        let path = "/auth/me";
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| Error::gateway(format!("{}: {}", path, e)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: WireUser = self.parse(response, path).await?;
                Ok(Some(user.into_domain()?))
            }
            status => Err(Error::gateway(format!("{}: HTTP {}", path, status))),
        }
    }

    async fn sync_guest_data(&self, guest: &Ledger) -> Result<()> {
        let path = "/finance/sync";
        self.send(self.request(Method::POST, path).json(guest), path)
            .await?;
        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<Ledger> {
        let path = "/finance/data";
        let response = self.send(self.request(Method::GET, path), path).await?;
        let snapshot: WireSnapshot = self.parse(response, path).await?;
        snapshot.into_domain()
    }

    async fn create_account(&self, input: &NewAccount) -> Result<Account> {
        let path = "/finance/accounts";
        let response = self
            .send(self.request(Method::POST, path).json(input), path)
            .await?;
        let account: WireAccount = self.parse(response, path).await?;
        account.into_domain()
    }

    async fn update_account(&self, id: &AccountId, patch: &AccountPatch) -> Result<Account> {
        let path = format!("/finance/accounts/{}", id);
        let response = self
            .send(self.request(Method::PUT, &path).json(patch), &path)
            .await?;
        let account: WireAccount = self.parse(response, &path).await?;
        account.into_domain()
    }

    async fn delete_account(&self, id: &AccountId) -> Result<()> {
        let path = format!("/finance/accounts/{}", id);
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }

    async fn create_transaction(&self, input: &NewTransaction) -> Result<Transaction> {
        let path = "/finance/transactions";
        // the service expects a concrete timestamp
        let mut input = input.clone();
        input.date = Some(input.date.unwrap_or_else(Utc::now));

        let response = self
            .send(self.request(Method::POST, path).json(&input), path)
            .await?;
        let tx: WireTransaction = self.parse(response, path).await?;
        tx.into_domain()
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction> {
        let path = format!("/finance/transactions/{}", id);
        let response = self
            .send(self.request(Method::PUT, &path).json(patch), &path)
            .await?;
        let tx: WireTransaction = self.parse(response, &path).await?;
        tx.into_domain()
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<()> {
        let path = format!("/finance/transactions/{}", id);
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }

    async fn bulk_delete_transactions(&self, ids: &[TransactionId]) -> Result<()> {
        let path = "/finance/transactions/bulk-delete";
        self.send(
            self.request(Method::DELETE, path).json(&json!({ "ids": ids })),
            path,
        )
        .await?;
        Ok(())
    }

    async fn delete_all_transactions(&self) -> Result<()> {
        let path = "/finance/transactions/delete-all";
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    async fn transfer_funds(&self, transfer: &TransferRequest) -> Result<()> {
        let path = "/finance/transfer";
        self.send(self.request(Method::POST, path).json(transfer), path)
            .await?;
        Ok(())
    }

    async fn create_account_type(&self, label: &str, theme: Theme) -> Result<AccountType> {
        let path = "/finance/account-types";
        let response = self
            .send(
                self.request(Method::POST, path)
                    .json(&json!({ "label": label, "theme": theme })),
                path,
            )
            .await?;
        let account_type: WireAccountType = self.parse(response, path).await?;
        account_type.into_domain()
    }

    async fn delete_account_type(&self, id: &AccountTypeId) -> Result<()> {
        let path = format!("/finance/account-types/{}", id);
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }

    async fn reset_all_data(&self) -> Result<()> {
        let path = "/finance/reset";
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_prefers_server_id() {
        let account: WireAccount = serde_json::from_str(
            r#"{"_id": "65a1", "id": "acc-1", "name": "Vault", "balance": "10.00", "type": "Savings"}"#,
        )
        .unwrap();
        let account = account.into_domain().unwrap();
        assert_eq!(account.id, AccountId::from("65a1"));
    }

    #[test]
    fn test_account_falls_back_to_client_id() {
        let account: WireAccount =
            serde_json::from_str(r#"{"id": "acc-1", "name": "Vault", "type": "Savings"}"#).unwrap();
        assert_eq!(account.into_domain().unwrap().id, AccountId::from("acc-1"));
    }

    #[test]
    fn test_account_without_any_id_is_rejected() {
        let account: WireAccount =
            serde_json::from_str(r#"{"name": "Vault", "type": "Savings"}"#).unwrap();
        assert!(account.into_domain().is_err());
    }

    #[test]
    fn test_transaction_wire_shape() {
        let tx: WireTransaction = serde_json::from_str(
            r#"{
                "_id": "65b2",
                "accountId": "65a1",
                "amount": "30.00",
                "type": "expense",
                "category": "Transfer",
                "transfer": true,
                "date": "2026-01-15T10:00:00Z"
            }"#,
        )
        .unwrap();
        let tx = tx.into_domain().unwrap();
        assert_eq!(tx.account_id, AccountId::from("65a1"));
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert!(tx.is_transfer);
    }

    #[test]
    fn test_snapshot_missing_sections_default_empty() {
        let snapshot: WireSnapshot = serde_json::from_str(r#"{"accounts": []}"#).unwrap();
        let ledger = snapshot.into_domain().unwrap();
        assert!(ledger.transactions.is_empty());
        assert!(ledger.account_types.is_empty());
    }
}
