//! Derived analytics - pure projections over a ledger snapshot
//!
//! Everything here is a function of the snapshot it is handed; nothing is
//! cached and nothing is mutated. Entries generated by transfers are excluded
//! from income/expense figures so money moving between two owned vaults is
//! not double-counted.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Ledger, Transaction, TransactionKind};

/// Headline figures for the current calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
}

/// One day of the income/expense time series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
}

fn counts_toward_stats(tx: &Transaction) -> bool {
    !tx.is_transfer
}

/// Total balance plus income/expense totals for the month containing `now`
pub fn snapshot_stats(ledger: &Ledger, now: DateTime<Utc>) -> FinancialStats {
    let total_balance = ledger.accounts.iter().map(|a| a.balance).sum();

    let mut monthly_income = Decimal::ZERO;
    let mut monthly_expenses = Decimal::ZERO;
    for tx in ledger.transactions.iter().filter(|t| counts_toward_stats(t)) {
        if tx.date.year() == now.year() && tx.date.month() == now.month() {
            match tx.kind {
                TransactionKind::Income => monthly_income += tx.amount,
                TransactionKind::Expense => monthly_expenses += tx.amount,
            }
        }
    }

    FinancialStats {
        total_balance,
        monthly_income,
        monthly_expenses,
    }
}

/// Per-day income and expense sums for the window of `days` days ending
/// `today`, oldest day first
pub fn daily_flows(ledger: &Ledger, days: u32, today: NaiveDate) -> Vec<DailyFlow> {
    (0..days)
        .map(|i| {
            let date = today - Duration::days((days - 1 - i) as i64);
            let mut income = Decimal::ZERO;
            let mut expenses = Decimal::ZERO;
            for tx in ledger
                .transactions
                .iter()
                .filter(|t| counts_toward_stats(t) && t.date.date_naive() == date)
            {
                match tx.kind {
                    TransactionKind::Income => income += tx.amount,
                    TransactionKind::Expense => expenses += tx.amount,
                }
            }
            DailyFlow {
                date,
                income,
                expenses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountId, TransactionId, TRANSFER_CATEGORY};
    use chrono::TimeZone;

    fn entry(
        account: &str,
        amount: i64,
        kind: TransactionKind,
        date: DateTime<Utc>,
        is_transfer: bool,
    ) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            account_id: AccountId::from(account),
            amount: Decimal::new(amount, 2),
            kind,
            category: if is_transfer {
                TRANSFER_CATEGORY.to_string()
            } else {
                "Food".to_string()
            },
            description: String::new(),
            date,
            balance_after: None,
            is_transfer,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_total_balance_sums_accounts() {
        let mut ledger = Ledger::default();
        ledger
            .accounts
            .push(Account::new(AccountId::from("a"), "A", Decimal::new(10000, 2)));
        ledger
            .accounts
            .push(Account::new(AccountId::from("b"), "B", Decimal::new(-2500, 2)));

        let stats = snapshot_stats(&ledger, fixed_now());
        assert_eq!(stats.total_balance, Decimal::new(7500, 2));
    }

    #[test]
    fn test_monthly_totals_ignore_other_months_and_transfers() {
        let now = fixed_now();
        let mut ledger = Ledger::default();
        ledger.transactions.push(entry("a", 5000, TransactionKind::Income, now, false));
        ledger.transactions.push(entry("a", 2000, TransactionKind::Expense, now, false));
        // previous month, same year
        ledger.transactions.push(entry(
            "a",
            9999,
            TransactionKind::Income,
            Utc.with_ymd_and_hms(2026, 7, 31, 23, 0, 0).unwrap(),
            false,
        ));
        // same month, previous year
        ledger.transactions.push(entry(
            "a",
            8888,
            TransactionKind::Expense,
            Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap(),
            false,
        ));
        // transfer pair in the current month
        ledger.transactions.push(entry("a", 3000, TransactionKind::Expense, now, true));
        ledger.transactions.push(entry("b", 3000, TransactionKind::Income, now, true));

        let stats = snapshot_stats(&ledger, now);
        assert_eq!(stats.monthly_income, Decimal::new(5000, 2));
        assert_eq!(stats.monthly_expenses, Decimal::new(2000, 2));
    }

    #[test]
    fn test_daily_flows_window_and_order() {
        let now = fixed_now();
        let today = now.date_naive();
        let mut ledger = Ledger::default();
        ledger.transactions.push(entry("a", 1500, TransactionKind::Expense, now, false));
        ledger.transactions.push(entry(
            "a",
            4000,
            TransactionKind::Income,
            now - Duration::days(2),
            false,
        ));
        // outside the window
        ledger.transactions.push(entry(
            "a",
            7777,
            TransactionKind::Expense,
            now - Duration::days(10),
            false,
        ));

        let flows = daily_flows(&ledger, 7, today);
        assert_eq!(flows.len(), 7);
        assert_eq!(flows[0].date, today - Duration::days(6));
        assert_eq!(flows[6].date, today);
        assert_eq!(flows[6].expenses, Decimal::new(1500, 2));
        assert_eq!(flows[4].income, Decimal::new(4000, 2));
        assert!(flows.iter().all(|f| f.income + f.expenses < Decimal::new(7777, 2)));
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let ledger = Ledger::default();
        let stats = snapshot_stats(&ledger, fixed_now());
        assert_eq!(stats.total_balance, Decimal::ZERO);
        assert_eq!(stats.monthly_income, Decimal::ZERO);

        let flows = daily_flows(&ledger, 30, fixed_now().date_naive());
        assert_eq!(flows.len(), 30);
        assert!(flows.iter().all(|f| f.income.is_zero() && f.expenses.is_zero()));
    }
}
