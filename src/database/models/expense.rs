use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics;

/// Label used when an expense carries no category.
pub const OTHER_CATEGORY: &str = "Other";

// every column except the key may be missing in stored rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub title: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<String>,               // YYYY-MM-DD or any ISO form with that prefix
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Expense {
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// Category label for grouping, falling back to "Other" when empty or missing.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => OTHER_CATEGORY,
        }
    }

    pub fn month_key(&self) -> Option<&str> {
        self.date.as_deref().and_then(analytics::month_key)
    }
}

// Request body for create and update. `amount` accepts a JSON number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewExpense {
    pub title: Option<String>,
    pub amount: Decimal,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}
