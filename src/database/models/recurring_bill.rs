use serde::{Serialize, Deserialize};
use rust_decimal::Decimal;

/// Monthly obligation anchored to a calendar day. `day_of_month` is kept in
/// [1, 31]; months shorter than the anchor resolve to their last day at
/// read time. There is no persisted paid flag: the due date is re-derived
/// from the anchor on every list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecurringBill {
    pub bill_id: i64,
    pub bill_name: String,
    pub amount: Decimal,
    pub day_of_month: i64,
    pub category_id: Option<i64>,
    pub currency: String,
    pub created_at: String,
}
