use serde::{Serialize, Deserialize};

/// Recurring service obligation anchored to an elapsed interval rather than
/// a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceItem {
    pub item_id: i64,
    pub item_name: String,
    pub item_type: String,              // 'vehicle' or 'appliance'
    pub last_service_date: String,      // ISO date string, parsed leniently at read time
    pub service_interval_days: i64,
    pub notes: Option<String>,
    pub created_at: String,
}
