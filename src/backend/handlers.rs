// src/backend/handlers.rs
use axum::{
    extract::{Path, State},
    Json,
    response::IntoResponse,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive; //converting Decimal to f64

use crate::analytics::{self, forecast, Confidence, ExpenseSummary, ForecastOutcome, Trend};
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::{Category, Expense, NewCategory, NewExpense};
use crate::error::{AppError, Result};

fn money(d: Decimal) -> f64 {
    d.round_dp(2).to_f64().unwrap_or(0.0)
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_expenses: f64,
    pub category_breakdown: BTreeMap<String, f64>,
    pub monthly_trend: BTreeMap<String, f64>,
    pub expense_count: usize,
}

impl From<ExpenseSummary> for SummaryResponse {
    fn from(summary: ExpenseSummary) -> Self {
        Self {
            total_expenses: money(summary.total_amount),
            category_breakdown: summary
                .category_breakdown
                .into_iter()
                .map(|(category, total)| (category, money(total)))
                .collect(),
            monthly_trend: summary
                .monthly_trend
                .into_iter()
                .map(|(month, total)| (month, money(total)))
                .collect(),
            expense_count: summary.expense_count,
        }
    }
}

// Fields after `prediction` are only present on a successful projection.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub prediction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_monthly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_months: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_totals: Option<Vec<f64>>,
}

impl PredictionResponse {
    fn empty(message: String, confidence: Option<Confidence>) -> Self {
        Self {
            success: false,
            message: Some(message),
            prediction: 0.0,
            confidence,
            trend: None,
            slope: None,
            average_monthly: None,
            last_month: None,
            data_points: None,
            historical_months: None,
            historical_totals: None,
        }
    }

    /// Body returned when the expense collection could not be read.
    pub fn failed(detail: impl std::fmt::Display) -> Self {
        Self::empty(format!("Prediction error: {detail}"), None)
    }
}

impl From<ForecastOutcome> for PredictionResponse {
    fn from(outcome: ForecastOutcome) -> Self {
        match outcome {
            ForecastOutcome::InsufficientData { .. } => Self::empty(
                forecast::INSUFFICIENT_DATA_MESSAGE.to_string(),
                Some(Confidence::Low),
            ),
            ForecastOutcome::Projected(f) => {
                let (historical_months, historical_totals): (Vec<String>, Vec<f64>) = f
                    .history
                    .into_iter()
                    .map(|(month, total)| (month, money(total)))
                    .unzip();
                Self {
                    success: true,
                    message: None,
                    prediction: analytics::round_cents(f.prediction),
                    confidence: Some(f.confidence),
                    trend: Some(f.trend),
                    slope: Some(analytics::round_cents(f.slope)),
                    average_monthly: Some(money(f.average_monthly)),
                    last_month: Some(money(f.last_month)),
                    data_points: Some(f.data_points),
                    historical_months: Some(historical_months),
                    historical_totals: Some(historical_totals),
                }
            }
        }
    }
}

/* ==========Expenses========== */

pub async fn list_expenses(State(state): State<AppState>) -> Result<Json<Vec<Expense>>> {
    let expenses = queries::list_expenses(&state.db).await?;
    Ok(Json(expenses))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>> {
    queries::get_expense(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Expense", id))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<NewExpense>,
) -> Result<impl IntoResponse> {
    let expense = queries::create_expense(&state.db, &payload).await?;
    tracing::info!(id = expense.id, amount = %payload.amount, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewExpense>,
) -> Result<Json<Value>> {
    if !queries::update_expense(&state.db, id, &payload).await? {
        return Err(AppError::not_found("Expense", id));
    }
    tracing::info!(id, "expense updated");
    Ok(Json(json!({ "message": "Expense updated successfully" })))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    if !queries::delete_expense(&state.db, id).await? {
        return Err(AppError::not_found("Expense", id));
    }
    tracing::info!(id, "expense deleted");
    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}

/* ==========Categories========== */

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(queries::list_categories(&state.db).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<NewCategory>,
) -> Result<impl IntoResponse> {
    let category = queries::create_category(&state.db, &payload).await?;
    tracing::info!(id = category.id, name = %category.name, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/* ==========Analytics========== */

pub async fn analytics_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>> {
    let expenses = queries::list_expenses(&state.db).await?;
    let summary = analytics::summarize(&expenses);
    tracing::debug!(count = summary.expense_count, "summary computed");
    Ok(Json(summary.into()))
}

// Insufficient history is still a 200; only a failed read is a 500.
pub async fn predict_next_month(
    State(state): State<AppState>,
) -> (StatusCode, Json<PredictionResponse>) {
    match queries::list_expenses(&state.db).await {
        Ok(expenses) => {
            let outcome = analytics::forecast_next_month(&expenses);
            tracing::debug!(projected = outcome.is_projected(), "forecast computed");
            (StatusCode::OK, Json(outcome.into()))
        }
        Err(e) => {
            tracing::error!(error = %e, "prediction failed to load expenses");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(PredictionResponse::failed(e)))
        }
    }
}
