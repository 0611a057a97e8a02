use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShoppingItem {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub purchased: bool,
    pub added_at: String,
}
