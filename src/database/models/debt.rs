use serde::{Serialize, Deserialize};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Debt {
    pub debt_id: i64,
    pub debt_name: String,          // lender or card name
    pub balance: Decimal,
    pub apr: Decimal,
    pub minimum_payment: Decimal,
    pub currency: String,
    pub created_at: String,
}
