//! Expense Statistics
//!
//! Aggregates over the full, unfiltered set of expenses.

use serde::{Deserialize, Serialize};

use super::expense::{Expense, DATE_FORMAT};
use super::money::CENTS_PER_UNIT;

/// Placeholder date range when there are no expenses
pub const EMPTY_DATE_RANGE: &str = "-";

/// Separator between the earliest and latest date
pub const DATE_RANGE_SEPARATOR: &str = " — ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    /// Sum of all amounts
    pub total_expenses: f64,
    pub total_entries: u64,
    /// "<earliest> — <latest>", or "-" when empty
    pub date_range: String,
    /// Mean amount, 0 when there are no entries
    pub avg_expense: f64,
}

impl ExpenseStats {
    pub fn compute(expenses: &[Expense]) -> Self {
        // Each record fits in i64 cents; their sum may not
        let total_cents: i128 = expenses.iter().map(|e| i128::from(e.amount_cents)).sum();
        let count = expenses.len() as u64;

        let earliest = expenses.iter().map(|e| e.date).min();
        let latest = expenses.iter().map(|e| e.date).max();

        let date_range = match (earliest, latest) {
            (Some(start), Some(end)) => format!(
                "{}{}{}",
                start.format(DATE_FORMAT),
                DATE_RANGE_SEPARATOR,
                end.format(DATE_FORMAT)
            ),
            _ => EMPTY_DATE_RANGE.to_string(),
        };

        let total_expenses = total_cents as f64 / CENTS_PER_UNIT as f64;
        let avg_expense = if count == 0 {
            0.0
        } else {
            total_expenses / count as f64
        };

        Self {
            total_expenses,
            total_entries: count,
            date_range,
            avg_expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::expense::NewExpense;
    use chrono::NaiveDate;

    fn expense(id: i64, date: &str, amount_cents: i64) -> Expense {
        NewExpense {
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            name: format!("expense {}", id),
            category: "Sand".to_string(),
            amount_cents,
            payment_method: "UPI".to_string(),
            floor: None,
            notes: None,
            proof_url: None,
        }
        .with_id(id)
    }

    #[test]
    fn test_empty_stats() {
        let stats = ExpenseStats::compute(&[]);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_expenses, 0.0);
        assert_eq!(stats.avg_expense, 0.0);
        assert_eq!(stats.date_range, "-");
    }

    #[test]
    fn test_stats_over_two_records() {
        let stats = ExpenseStats::compute(&[
            expense(2, "2024-03-01", 20_000),
            expense(1, "2024-01-01", 10_000),
        ]);
        assert_eq!(stats.total_expenses, 300.0);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.avg_expense, 150.0);
        assert_eq!(stats.date_range, "2024-01-01 — 2024-03-01");
    }

    #[test]
    fn test_total_beyond_i64_cents() {
        let stats = ExpenseStats::compute(&[
            expense(1, "2024-01-01", i64::MAX - 1),
            expense(2, "2024-01-02", i64::MAX - 1),
            expense(3, "2024-01-03", 5_000_000_000_000_000_000),
        ]);

        assert_eq!(stats.total_entries, 3);
        assert!(stats.total_expenses > 0.0);
        let expected = (2.0 * (i64::MAX - 1) as f64 + 5e18) / 100.0;
        assert!((stats.total_expenses - expected).abs() / expected < 1e-12);
        assert!((stats.avg_expense - expected / 3.0).abs() / expected < 1e-12);
    }

    #[test]
    fn test_single_record_range() {
        let stats = ExpenseStats::compute(&[expense(1, "2024-05-05", 1)]);
        assert_eq!(stats.date_range, "2024-05-05 — 2024-05-05");
        assert_eq!(stats.total_expenses, 0.01);
    }
}
