//! Expense analytics: category/month aggregation and the next-month forecast.
//!
//! Both views group by the same month key, derived by [`month_key`] from the
//! literal date string, so the summary's monthly trend and the forecaster's
//! history always agree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::database::models::Expense;

pub mod forecast;
pub mod summary;

pub use forecast::{forecast_next_month, Confidence, Forecast, ForecastOutcome, Trend};
pub use summary::{summarize, ExpenseSummary};

/// Length of a `YYYY-MM` month key.
const MONTH_KEY_LEN: usize = 7;

/// The `YYYY-MM` prefix of a stored date string. Dates shorter than seven
/// characters have no month.
pub fn month_key(date: &str) -> Option<&str> {
    date.get(..MONTH_KEY_LEN)
}

/// Sums amounts per month key. `BTreeMap` ordering on `YYYY-MM` keys is chronological.
pub fn monthly_totals(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        if let Some(key) = expense.month_key() {
            let total = totals.entry(key.to_string()).or_insert(Decimal::ZERO);
            *total = total.saturating_add(expense.amount_or_zero());
        }
    }
    totals
}

/// Rounds a figure to cents for presentation.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
