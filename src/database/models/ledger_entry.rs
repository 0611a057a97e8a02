use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub entry_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub is_expense: bool,
    pub description: Option<String>,
    pub currency: String,
    pub entry_date: NaiveDate,
    pub created_at: String,     // ISO timestamp string
}

// per-category expense total for one month, feeds the summary splits
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategorySpending {
    pub category: String,
    pub total_amount: f64,
}
