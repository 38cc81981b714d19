use anyhow::Result;
use sqlx::{Pool, Sqlite};

use crate::analytics::{self, ExpenseSummary, ForecastOutcome};
use crate::database::db::{connection, queries};
use crate::database::models::{Category, Expense, NewExpense};

/// The terminal front end talks to SQLite directly through this handle.
#[derive(Clone)]
pub struct Client {
    pool: Pool<Sqlite>,
}

impl Client {
    pub async fn sqlite(db_url: &str, max_connections: u32) -> Result<Self> {
        let pool = connection::get_db_pool(db_url, max_connections).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    // ============= Expenses =============

    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(queries::list_expenses(&self.pool).await?)
    }

    pub async fn create_expense(&self, req: &NewExpense) -> Result<Expense> {
        Ok(queries::create_expense(&self.pool, req).await?)
    }

    pub async fn delete_expense(&self, id: i64) -> Result<bool> {
        Ok(queries::delete_expense(&self.pool, id).await?)
    }

    // ============= Categories =============

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(queries::list_categories(&self.pool).await?)
    }

    // ============= Analytics =============

    /// Summary and forecast over one read of the expense table.
    pub async fn analytics(&self) -> Result<(ExpenseSummary, ForecastOutcome)> {
        let expenses = self.list_expenses().await?;
        Ok((
            analytics::summarize(&expenses),
            analytics::forecast_next_month(&expenses),
        ))
    }
}
