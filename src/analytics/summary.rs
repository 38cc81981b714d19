//! Category and month totals over a set of expenses.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::analytics::monthly_totals;
use crate::database::models::Expense;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseSummary {
    pub total_amount: Decimal,
    pub category_breakdown: HashMap<String, Decimal>,
    pub monthly_trend: BTreeMap<String, Decimal>,
    /// Every input record, dated or not.
    pub expense_count: usize,
}

/// Totals per category and per month over the full expense set.
///
/// Missing amounts count as zero. Records without a usable date still count
/// toward the total and the category breakdown but not the monthly trend.
/// Sums saturate at `Decimal::MAX`.
pub fn summarize(expenses: &[Expense]) -> ExpenseSummary {
    let mut total_amount = Decimal::ZERO;
    let mut category_breakdown: HashMap<String, Decimal> = HashMap::new();

    for expense in expenses {
        let amount = expense.amount_or_zero();
        total_amount = total_amount.saturating_add(amount);
        let category = category_breakdown
            .entry(expense.category_label().to_string())
            .or_insert(Decimal::ZERO);
        *category = category.saturating_add(amount);
    }

    ExpenseSummary {
        total_amount,
        category_breakdown,
        monthly_trend: monthly_totals(expenses),
        expense_count: expenses.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn expense(amount: Option<&str>, category: Option<&str>, date: Option<&str>) -> Expense {
        Expense {
            title: Some("Coffee".to_string()),
            amount: amount.map(dec),
            category: category.map(str::to_string),
            date: date.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(Some("12.50"), Some("Food"), Some("2024-01-03")),
            expense(Some("7.25"), Some("Food"), Some("2024-02-11")),
            expense(Some("60"), Some("Transport"), Some("2024-02-28T08:00:00")),
            expense(Some("3.10"), Some(""), Some("2024-01-19")),
            expense(Some("40"), None, None),
            expense(None, Some("Bills"), Some("2024-03-01")),
            expense(Some("9.99"), Some("Shopping"), Some("2024")),
        ]
    }

    #[test]
    fn empty_input_is_a_zero_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert!(summary.category_breakdown.is_empty());
        assert!(summary.monthly_trend.is_empty());
        assert_eq!(summary.expense_count, 0);
    }

    #[test]
    fn totals_every_record_and_counts_undated_ones() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_amount, dec("132.84"));
        assert_eq!(summary.expense_count, 7);
    }

    #[test]
    fn empty_and_missing_categories_fall_under_other() {
        let summary = summarize(&sample());
        assert_eq!(summary.category_breakdown["Other"], dec("43.10"));
        assert_eq!(summary.category_breakdown["Food"], dec("19.75"));
        assert_eq!(summary.category_breakdown["Bills"], Decimal::ZERO);
        assert!(!summary.category_breakdown.contains_key(""));
    }

    #[test]
    fn category_breakdown_partitions_the_total() {
        let summary = summarize(&sample());
        let partitioned: Decimal = summary.category_breakdown.values().copied().sum();
        assert_eq!(partitioned, summary.total_amount);
    }

    #[test]
    fn monthly_trend_skips_undated_records() {
        let summary = summarize(&sample());
        let keys: Vec<&str> = summary.monthly_trend.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(summary.monthly_trend["2024-01"], dec("15.60"));
        assert_eq!(summary.monthly_trend["2024-02"], dec("67.25"));

        let dated: Decimal = summary.monthly_trend.values().copied().sum();
        assert!(dated < summary.total_amount);
    }

    #[test]
    fn monthly_trend_matches_total_when_every_date_is_valid() {
        let expenses = vec![
            expense(Some("10"), Some("Food"), Some("2024-05-01")),
            expense(Some("20"), Some("Food"), Some("2024-06-01")),
        ];
        let summary = summarize(&expenses);
        let dated: Decimal = summary.monthly_trend.values().copied().sum();
        assert_eq!(dated, summary.total_amount);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let max = Decimal::MAX.to_string();
        let expenses = vec![
            expense(Some(max.as_str()), Some("Bills"), Some("2024-01-15")),
            expense(Some(max.as_str()), Some("Bills"), Some("2024-02-15")),
        ];
        let summary = summarize(&expenses);
        assert_eq!(summary.total_amount, Decimal::MAX);
        assert_eq!(summary.category_breakdown["Bills"], Decimal::MAX);
        assert_eq!(summary.monthly_trend["2024-02"], Decimal::MAX);
        assert_eq!(summary.expense_count, 2);
    }
}
