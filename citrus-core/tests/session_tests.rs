//! Session transition and remote-path tests
//!
//! These drive the engine's login/logout protocol and authenticated mutations
//! against the in-memory demo gateway, which behaves like the real service:
//! it assigns its own ids and is authoritative for balances. The gateway's
//! offline switch exercises every failure path.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::TempDir;

use citrus_core::{
    DemoGateway, FinanceEngine, GuestVault, LedgerGateway, MutationOutcome, NewAccount,
    NewTransaction, TransactionKind, TransferRequest, UserProfile,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn user() -> UserProfile {
    UserProfile::new("u-demo", "demo@citrus.app", "Demo User")
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn engine_with(gateway: &Arc<DemoGateway>, dir: &TempDir) -> FinanceEngine {
    FinanceEngine::new(gateway.clone(), GuestVault::new(dir.path()))
}

async fn guest_account(engine: &mut FinanceEngine, name: &str, cents: i64) -> citrus_core::AccountId {
    engine
        .add_account(NewAccount {
            name: name.to_string(),
            balance: money(cents),
            account_type: "Current".to_string(),
            color: None,
        })
        .await
        .unwrap();
    engine
        .ledger()
        .accounts
        .iter()
        .find(|a| a.name == name)
        .unwrap()
        .id
        .clone()
}

// ============================================================================
// Login transition
// ============================================================================

#[tokio::test]
async fn test_login_syncs_guest_data_and_clears_store() {
    let gateway = Arc::new(DemoGateway::new());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);

    // build up some guest state
    engine.set_session(None).await;
    let account = guest_account(&mut engine, "Holiday Fund", 30000).await;
    engine
        .add_transaction(NewTransaction {
            account_id: account,
            amount: money(1500),
            kind: TransactionKind::Expense,
            category: "Food".to_string(),
            description: String::new(),
            date: None,
        })
        .await
        .unwrap();

    engine.set_session(Some(user())).await;

    // the guest snapshot moved to the service and the local copy is gone
    let vault = GuestVault::new(dir.path());
    assert!(vault.load().unwrap().is_none());

    // the engine now holds the remote state under server-assigned ids
    assert!(engine.is_authenticated());
    let ledger = engine.ledger();
    assert_eq!(ledger.accounts.len(), 5); // 4 defaults + Holiday Fund
    assert!(ledger.accounts.iter().all(|a| a.id.as_str().starts_with("srv-acc-")));

    // cross-references were remapped with the identities
    for tx in &ledger.transactions {
        assert!(ledger.account(&tx.account_id).is_some());
    }
    let holiday = ledger.accounts.iter().find(|a| a.name == "Holiday Fund").unwrap();
    assert_eq!(holiday.balance, money(28500));
}

#[tokio::test]
async fn test_login_with_empty_store_just_fetches() {
    let gateway = Arc::new(DemoGateway::seeded());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);

    engine.set_session(Some(user())).await;

    let remote = gateway.fetch_snapshot().await.unwrap();
    assert_eq!(engine.ledger(), &remote);
    // nothing was invented client-side: no default guest types appear
    assert!(engine
        .ledger()
        .account_types
        .iter()
        .all(|t| t.id.as_str().starts_with("srv-type-")));
}

#[tokio::test]
async fn test_failed_sync_retains_guest_snapshot_for_retry() {
    let gateway = Arc::new(DemoGateway::new());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);

    engine.set_session(None).await;
    guest_account(&mut engine, "Precious", 7700).await;

    // first login attempt: the service is unreachable
    gateway.set_offline(true);
    engine.set_session(Some(user())).await;

    // ledger is last-known-good, never undefined
    assert!(engine.ledger().accounts.iter().any(|a| a.name == "Precious"));

    // snapshot retained and stamped
    let vault = GuestVault::new(dir.path());
    let record = vault.load().unwrap().expect("guest snapshot must survive");
    assert!(record.last_sync_attempt.is_some());

    // log out, service comes back, log in again: the retry succeeds
    engine.set_session(None).await;
    gateway.set_offline(false);
    engine.set_session(Some(user())).await;

    assert!(vault.load().unwrap().is_none());
    assert!(engine
        .ledger()
        .accounts
        .iter()
        .any(|a| a.name == "Precious" && a.id.as_str().starts_with("srv-acc-")));
}

#[tokio::test]
async fn test_logout_returns_to_guest_defaults() {
    let gateway = Arc::new(DemoGateway::seeded());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);

    engine.set_session(Some(user())).await;
    assert!(engine.is_authenticated());

    engine.set_session(None).await;
    assert!(!engine.is_authenticated());
    // empty store: the built-in guest ledger appears
    assert_eq!(engine.ledger().accounts.len(), 4);
    assert_eq!(engine.ledger().account_types.len(), 4);
    assert!(engine.ledger().transactions.is_empty());
}

#[tokio::test]
async fn test_repeated_authenticated_signal_refetches() {
    let gateway = Arc::new(DemoGateway::new());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);

    engine.set_session(Some(user())).await;
    assert!(engine.ledger().accounts.is_empty());

    // the server state moves behind the engine's back
    gateway
        .create_account(&NewAccount {
            name: "Server Side".to_string(),
            balance: money(100),
            account_type: String::new(),
            color: None,
        })
        .await
        .unwrap();

    engine.set_session(Some(user())).await;
    assert_eq!(engine.ledger().accounts.len(), 1);
}

// ============================================================================
// Remote-path mutations
// ============================================================================

#[tokio::test]
async fn test_remote_mutations_adopt_refetched_state() {
    let gateway = Arc::new(DemoGateway::new());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);
    engine.set_session(Some(user())).await;

    engine
        .add_account(NewAccount {
            name: "Cloud Vault".to_string(),
            balance: money(10000),
            account_type: "Current".to_string(),
            color: None,
        })
        .await
        .unwrap();

    let account = engine.ledger().accounts[0].clone();
    assert!(account.id.as_str().starts_with("srv-acc-"));
    // the service fills the holder from the profile
    assert_eq!(account.card_holder.as_deref(), Some("DEMO USER"));

    engine
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            amount: money(2500),
            kind: TransactionKind::Expense,
            category: "Food".to_string(),
            description: String::new(),
            date: None,
        })
        .await
        .unwrap();

    // balance arithmetic happened on the service, the engine just re-fetched
    assert_eq!(engine.ledger().account(&account.id).unwrap().balance, money(7500));

    // and the guest store stayed untouched throughout
    assert!(GuestVault::new(dir.path()).load().unwrap().is_none());
}

#[tokio::test]
async fn test_remote_failure_leaves_last_known_good_state() {
    let gateway = Arc::new(DemoGateway::seeded());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);
    engine.set_session(Some(user())).await;

    let before = engine.ledger().clone();
    let account_id = before.accounts[0].id.clone();

    gateway.set_offline(true);

    let outcome = engine
        .add_transaction(NewTransaction {
            account_id: account_id.clone(),
            amount: money(100),
            kind: TransactionKind::Expense,
            category: String::new(),
            description: String::new(),
            date: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::RemoteFailed);

    let outcome = engine.delete_account(&account_id).await.unwrap();
    assert_eq!(outcome, MutationOutcome::RemoteFailed);

    assert_eq!(engine.ledger(), &before);
}

#[tokio::test]
async fn test_transfer_reraises_remote_failure() {
    let gateway = Arc::new(DemoGateway::seeded());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);
    engine.set_session(Some(user())).await;

    let before = engine.ledger().clone();
    let source = before.accounts[0].id.clone();
    let target = before.accounts[1].id.clone();

    gateway.set_offline(true);
    let result = engine
        .transfer_funds(TransferRequest {
            source_account_id: source.clone(),
            target_account_id: target.clone(),
            amount: money(5000),
            date: Utc::now(),
            description: None,
        })
        .await;

    assert!(result.is_err());
    assert_eq!(engine.ledger(), &before);

    // the same transfer goes through once the service is reachable
    gateway.set_offline(false);
    engine
        .transfer_funds(TransferRequest {
            source_account_id: source.clone(),
            target_account_id: target.clone(),
            amount: money(5000),
            date: Utc::now(),
            description: Some("Top up".to_string()),
        })
        .await
        .unwrap();

    let source_after = engine.ledger().account(&source).unwrap().balance;
    let target_after = engine.ledger().account(&target).unwrap().balance;
    assert_eq!(source_after, before.account(&source).unwrap().balance - money(5000));
    assert_eq!(target_after, before.account(&target).unwrap().balance + money(5000));
}

#[tokio::test]
async fn test_remote_reset_clears_service_state() {
    let gateway = Arc::new(DemoGateway::seeded());
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with(&gateway, &dir);
    engine.set_session(Some(user())).await;
    assert!(!engine.ledger().accounts.is_empty());

    engine.reset_all_data().await.unwrap();

    assert!(engine.ledger().accounts.is_empty());
    assert!(engine.ledger().transactions.is_empty());
    assert!(engine.ledger().account_types.is_empty());
    assert!(gateway.fetch_snapshot().await.unwrap().is_empty());
}
