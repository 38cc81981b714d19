//! Next-month spend forecast.
//!
//! Monthly totals are indexed `0..n` in chronological order and fitted with a
//! closed-form least-squares line; the prediction is that line evaluated at
//! index `n`. Nothing is cached between calls, every forecast is re-derived
//! from the records it is given.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::monthly_totals;
use crate::database::models::Expense;

/// Slope (currency units per month) beyond which spending counts as trending.
pub const TREND_SLOPE_THRESHOLD: f64 = 100.0;
pub const MIN_MONTHS: usize = 2;
pub const MEDIUM_CONFIDENCE_MONTHS: usize = 4;
pub const HIGH_CONFIDENCE_MONTHS: usize = 6;
/// Months of history echoed back alongside a forecast.
pub const HISTORY_WINDOW: usize = 3;

pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Insufficient data. Need at least 2 months of expense history.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_SLOPE_THRESHOLD {
            Trend::Increasing
        } else if slope < -TREND_SLOPE_THRESHOLD {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_months(months: usize) -> Self {
        if months >= HIGH_CONFIDENCE_MONTHS {
            Confidence::High
        } else if months >= MEDIUM_CONFIDENCE_MONTHS {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least squares over `(i, values[i])`. Needs at least two points.
    pub fn over_indices(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_MONTHS {
            return None;
        }
        let n = values.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// A successful projection, kept at full precision. Rounding happens when it is presented.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub prediction: f64,
    pub confidence: Confidence,
    pub trend: Trend,
    pub slope: f64,
    pub intercept: f64,
    pub average_monthly: Decimal,
    pub last_month: Decimal,
    pub data_points: usize,
    /// Up to the last three `(month, total)` pairs, oldest first.
    pub history: Vec<(String, Decimal)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Projected(Forecast),
    /// Fewer than two distinct months carried a usable date.
    InsufficientData { months: usize },
}

impl ForecastOutcome {
    pub fn is_projected(&self) -> bool {
        matches!(self, ForecastOutcome::Projected(_))
    }
}

pub fn forecast_next_month(expenses: &[Expense]) -> ForecastOutcome {
    let buckets: Vec<(String, Decimal)> = monthly_totals(expenses).into_iter().collect();
    let data_points = buckets.len();

    let totals: Vec<f64> = buckets
        .iter()
        .map(|(_, total)| total.to_f64().unwrap_or(0.0))
        .collect();

    let Some(fit) = LinearFit::over_indices(&totals) else {
        return ForecastOutcome::InsufficientData { months: data_points };
    };

    let prediction = fit.at(data_points as f64).max(0.0);

    let sum = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, (_, total)| acc.saturating_add(*total));
    let average_monthly = sum / Decimal::from(data_points);
    let last_month = buckets
        .last()
        .map(|(_, total)| *total)
        .unwrap_or(Decimal::ZERO);
    let history = buckets[data_points.saturating_sub(HISTORY_WINDOW)..].to_vec();

    ForecastOutcome::Projected(Forecast {
        prediction,
        confidence: Confidence::from_months(data_points),
        trend: Trend::from_slope(fit.slope),
        slope: fit.slope,
        intercept: fit.intercept,
        average_monthly,
        last_month,
        data_points,
        history,
    })
}
