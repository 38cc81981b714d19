use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

use crate::database::models::{Category, Expense, NewCategory, NewExpense};
/*
SQL for the expense and category collections.
Amounts are stored as decimal TEXT and parsed back into Decimal on read.
 */

const DEFAULT_CATEGORY_ICON: &str = "📁";
const DEFAULT_CATEGORY_COLOR: &str = "#000000";

/// Categories inserted on first start.
pub const FIXED_CATEGORIES: [(&str, &str, &str); 7] = [
    ("Food", "🍔", "#f97316"),
    ("Transport", "🚌", "#3b82f6"),
    ("Shopping", "🛍️", "#ec4899"),
    ("Bills", "🧾", "#ef4444"),
    ("Entertainment", "🎬", "#8b5cf6"),
    ("Health", "💊", "#10b981"),
    ("Other", "📁", "#6b7280"),
];

fn now_iso() -> String {
    chrono::Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string()
}

// An unreadable amount is kept as missing rather than failing the whole list.
fn parse_amount(raw: Option<String>) -> Option<Decimal> {
    let raw = raw?;
    let raw = raw.trim();
    Decimal::from_str_exact(raw)
        .or_else(|_| Decimal::from_str(raw))
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn expense_from_row(row: &SqliteRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        amount: parse_amount(row.try_get("amount")?),
        category: row.try_get("category")?,
        date: row.try_get("date")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

 /*==========Expense Queries=========== */

// Every stored expense, newest date first.
pub async fn list_expenses(pool: &Pool<Sqlite>) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, amount, category, date, description, created_at, updated_at
        FROM expenses
        ORDER BY date DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(expense_from_row)
    .collect::<Result<Vec<Expense>, sqlx::Error>>()
}

pub async fn get_expense(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Expense>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, title, amount, category, date, description, created_at, updated_at
        FROM expenses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(expense_from_row).transpose()
}

// Missing date defaults to the current local timestamp, missing description to "".
pub async fn create_expense(pool: &Pool<Sqlite>, new: &NewExpense) -> Result<Expense, sqlx::Error> {
    let date = new.date.clone().unwrap_or_else(now_iso);
    let description = new.description.clone().unwrap_or_default();

    let row = sqlx::query(
        r#"
        INSERT INTO expenses (title, amount, category, date, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, title, amount, category, date, description, created_at, updated_at
        "#,
    )
    .bind(new.title.as_deref())
    .bind(new.amount.to_string())
    .bind(new.category.as_deref())
    .bind(date)
    .bind(description)
    .bind(now_iso())
    .fetch_one(pool)
    .await?;

    expense_from_row(&row)
}

// Overwrites every editable field. Returns false when no row has that id.
pub async fn update_expense(
    pool: &Pool<Sqlite>,
    id: i64,
    changes: &NewExpense,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE expenses
        SET title = ?, amount = ?, category = ?, date = ?, description = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.title.as_deref())
    .bind(changes.amount.to_string())
    .bind(changes.category.as_deref())
    .bind(changes.date.as_deref())
    .bind(changes.description.clone().unwrap_or_default())
    .bind(now_iso())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_expense(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

 /*==========Category Queries=========== */

pub async fn list_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, icon, color, created_at FROM categories ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create_category(
    pool: &Pool<Sqlite>,
    new: &NewCategory,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, icon, color, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, icon, color, created_at
        "#,
    )
    .bind(&new.name)
    .bind(new.icon.as_deref().unwrap_or(DEFAULT_CATEGORY_ICON))
    .bind(new.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR))
    .bind(now_iso())
    .fetch_one(pool)
    .await
}

// Safe to call on every start; existing names are left alone.
pub async fn seed_fixed_categories(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for (name, icon, color) in FIXED_CATEGORIES {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories (name, icon, color, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(icon)
        .bind(color)
        .bind(now_iso())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::{connection, migrate};

    async fn test_pool() -> Pool<Sqlite> {
        let pool = connection::get_db_pool("sqlite::memory:", 1).await.unwrap();
        migrate::run_migrations(&pool).await.unwrap();
        pool
    }

    fn grocery(amount: &str, date: Option<&str>) -> NewExpense {
        NewExpense {
            title: Some("Groceries".to_string()),
            amount: amount.parse().unwrap(),
            category: Some("Food".to_string()),
            date: date.map(str::to_string),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_then_fetch_expense() {
        let pool = test_pool().await;
        let created = create_expense(&pool, &grocery("42.10", Some("2024-04-02"))).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.amount, Some("42.10".parse().unwrap()));
        assert_eq!(created.description.as_deref(), Some(""));
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_none());

        let fetched = get_expense(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_expense(&pool, created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_date_defaults_to_now() {
        let pool = test_pool().await;
        let created = create_expense(&pool, &grocery("5", None)).await.unwrap();
        let date = created.date.unwrap();
        assert!(date.starts_with(&chrono::Local::now().format("%Y-").to_string()));
        assert!(crate::analytics::month_key(&date).is_some());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        create_expense(&pool, &grocery("1", Some("2024-01-15"))).await.unwrap();
        create_expense(&pool, &grocery("2", Some("2024-03-15"))).await.unwrap();
        create_expense(&pool, &grocery("3", Some("2024-02-15"))).await.unwrap();

        let dates: Vec<String> = list_expenses(&pool)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|e| e.date)
            .collect();
        assert_eq!(dates, vec!["2024-03-15", "2024-02-15", "2024-01-15"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let pool = test_pool().await;
        let created = create_expense(&pool, &grocery("10", Some("2024-01-01"))).await.unwrap();

        let mut changes = grocery("12.75", Some("2024-01-02"));
        changes.category = Some("Bills".to_string());
        assert!(update_expense(&pool, created.id, &changes).await.unwrap());
        assert!(!update_expense(&pool, created.id + 1, &changes).await.unwrap());

        let updated = get_expense(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(updated.category.as_deref(), Some("Bills"));
        assert_eq!(updated.amount, Some("12.75".parse().unwrap()));
        assert!(updated.updated_at.is_some());

        assert!(delete_expense(&pool, created.id).await.unwrap());
        assert!(!delete_expense(&pool, created.id).await.unwrap());
        assert!(list_expenses(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn loosely_typed_rows_still_load() {
        let pool = test_pool().await;
        for row in [
            "('legacy', NULL, NULL)",
            "('typo', 'twelve', '2024-05-01')",
            "('numeric', 19.5, '2024-05-02')",
        ] {
            sqlx::query(&format!("INSERT INTO expenses (title, amount, date) VALUES {row}"))
                .execute(&pool)
                .await
                .unwrap();
        }

        let expenses = list_expenses(&pool).await.unwrap();
        assert_eq!(expenses.len(), 3);
        let by_title = |t: &str| expenses.iter().find(|e| e.title.as_deref() == Some(t)).unwrap();
        assert_eq!(by_title("legacy").amount, None);
        assert_eq!(by_title("typo").amount, None);
        assert_eq!(by_title("numeric").amount, Some("19.5".parse().unwrap()));
    }

    #[tokio::test]
    async fn categories_seed_once_and_apply_defaults() {
        let pool = test_pool().await;
        seed_fixed_categories(&pool).await.unwrap();
        seed_fixed_categories(&pool).await.unwrap();
        assert_eq!(list_categories(&pool).await.unwrap().len(), FIXED_CATEGORIES.len());

        let created = create_category(
            &pool,
            &NewCategory { name: "Travel".to_string(), icon: None, color: None },
        )
        .await
        .unwrap();
        assert_eq!(created.icon, "📁");
        assert_eq!(created.color, "#000000");

        let names: Vec<String> = list_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(names.contains(&"Travel".to_string()));
    }
}
