use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub category_type: String,      // 'INCOME' or 'EXPENSE'
    pub icon: String,
}
