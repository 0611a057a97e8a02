// src/backend/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::{Category, Debt, LedgerEntry, ShoppingItem};
use crate::recurrence;

type ApiError = (StatusCode, String);

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
    move |e| {
        warn!(error = %e, "{} failed", context);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{} failed", context))
    }
}

fn not_found(what: &str, id: i64) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{} {} not found", what, id))
}

/*==========Categories===========*/

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = queries::get_all_categories(&state.db)
        .await
        .map_err(db_error("list categories"))?;
    Ok(Json(categories))
}

/*==========Ledger===========*/

#[derive(Debug, Deserialize)]
pub struct CreateLedgerEntry {
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub is_expense: bool,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub entry_date: Option<NaiveDate>, // defaults to today
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub month: Option<String>, // 'YYYY-MM'
    pub limit: Option<i64>,
}

pub async fn list_ledger(
    State(state): State<AppState>,
    Query(q): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    if let Some(month) = q.month.as_deref() {
        validate_month(month)?;
    }
    let entries = queries::get_ledger_entries(&state.db, q.month.as_deref(), q.limit)
        .await
        .map_err(db_error("list ledger entries"))?;
    Ok(Json(entries))
}

pub async fn create_ledger_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateLedgerEntry>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let entry_date = payload.entry_date.unwrap_or_else(|| Utc::now().date_naive());
    let currency = payload.currency.unwrap_or_else(|| "USD".to_string());

    let entry_id = queries::create_ledger_entry(
        &state.db,
        payload.category_id,
        &payload.amount,
        payload.is_expense,
        payload.description.as_deref(),
        &currency,
        entry_date,
    )
    .await
    .map_err(db_error("create ledger entry"))?;

    Ok((StatusCode::CREATED, Json(json!({ "entry_id": entry_id }))))
}

pub async fn delete_ledger_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = queries::delete_ledger_entry(&state.db, entry_id)
        .await
        .map_err(db_error("delete ledger entry"))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("ledger entry", entry_id))
    }
}

/*==========Debts===========*/

#[derive(Debug, Deserialize)]
pub struct CreateDebt {
    pub debt_name: String,
    pub balance: Decimal,
    pub apr: Option<Decimal>,
    pub minimum_payment: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DebtPayment {
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
}

pub async fn list_debts(State(state): State<AppState>) -> Result<Json<Vec<Debt>>, ApiError> {
    let debts = queries::get_all_debts(&state.db)
        .await
        .map_err(db_error("list debts"))?;
    Ok(Json(debts))
}

pub async fn create_debt(
    State(state): State<AppState>,
    Json(payload): Json<CreateDebt>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let debt_id = queries::create_debt(
        &state.db,
        &payload.debt_name,
        &payload.balance,
        &payload.apr.unwrap_or(Decimal::ZERO),
        &payload.minimum_payment.unwrap_or(Decimal::ZERO),
        payload.currency.as_deref().unwrap_or("USD"),
    )
    .await
    .map_err(db_error("create debt"))?;

    Ok((StatusCode::CREATED, Json(json!({ "debt_id": debt_id }))))
}

pub async fn record_debt_payment(
    State(state): State<AppState>,
    Path(debt_id): Path<i64>,
    Json(payload): Json<DebtPayment>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let payment_date = payload.payment_date.unwrap_or_else(|| Utc::now().date_naive());
    let recorded = queries::record_debt_payment(&state.db, debt_id, &payload.amount, payment_date)
        .await
        .map_err(db_error("record debt payment"))?;
    if recorded {
        Ok((StatusCode::CREATED, Json(json!({ "debt_id": debt_id }))))
    } else {
        Err(not_found("debt", debt_id))
    }
}

pub async fn delete_debt(
    State(state): State<AppState>,
    Path(debt_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = queries::delete_debt(&state.db, debt_id)
        .await
        .map_err(db_error("delete debt"))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("debt", debt_id))
    }
}

/*==========Recurring Bills===========*/

#[derive(Debug, Deserialize)]
pub struct CreateBill {
    pub bill_name: String,
    pub amount: Decimal,
    pub day_of_month: i64, // out-of-range values are clamped into [1, 31]
    pub category_id: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BillView {
    pub bill_id: i64,
    pub bill_name: String,
    pub amount: Decimal,
    pub day_of_month: i64,
    pub category_id: Option<i64>,
    pub currency: String,
    pub next_due: NaiveDate,
    pub days_remaining: i64,
}

// Bills come back sorted soonest-due first. `today` is read once so every
// row in the response is derived against the same date.
pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<BillView>>, ApiError> {
    let today = Utc::now().date_naive();
    let bills = queries::get_all_bills(&state.db)
        .await
        .map_err(db_error("list bills"))?;

    let mut views: Vec<BillView> = bills
        .into_iter()
        .map(|b| {
            let next_due = recurrence::next_due_date(b.day_of_month, today);
            BillView {
                bill_id: b.bill_id,
                bill_name: b.bill_name,
                amount: b.amount,
                day_of_month: b.day_of_month,
                category_id: b.category_id,
                currency: b.currency,
                next_due,
                days_remaining: recurrence::days_remaining(next_due, today),
            }
        })
        .collect();
    // stable sort: ties keep store order
    views.sort_by_key(|v| v.days_remaining);

    Ok(Json(views))
}

pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBill>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let bill_id = queries::create_bill(
        &state.db,
        &payload.bill_name,
        &payload.amount,
        payload.day_of_month,
        payload.category_id,
        payload.currency.as_deref().unwrap_or("USD"),
    )
    .await
    .map_err(db_error("create bill"))?;

    Ok((StatusCode::CREATED, Json(json!({ "bill_id": bill_id }))))
}

// Paying a bill writes the ledger entry; the bill row itself never changes.
// The due date is re-derived from the anchor day on the next list.
pub async fn pay_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<i64>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let bill = queries::get_bill_by_id(&state.db, bill_id)
        .await
        .map_err(db_error("load bill"))?
        .ok_or_else(|| not_found("bill", bill_id))?;

    let today = Utc::now().date_naive();
    let entry_id = queries::create_ledger_entry(
        &state.db,
        bill.category_id,
        &bill.amount,
        true,
        Some(&bill.bill_name),
        &bill.currency,
        today,
    )
    .await
    .map_err(db_error("record bill payment"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "bill_id": bill_id, "entry_id": entry_id })),
    ))
}

pub async fn delete_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = queries::delete_bill(&state.db, bill_id)
        .await
        .map_err(db_error("delete bill"))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("bill", bill_id))
    }
}

/*==========Maintenance===========*/

#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceItem {
    pub item_name: String,
    pub item_type: String, // 'vehicle' or 'appliance'
    pub last_service_date: NaiveDate,
    pub service_interval_days: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogService {
    pub service_date: Option<NaiveDate>, // defaults to today
}

#[derive(Debug, Serialize)]
pub struct MaintenanceView {
    pub item_id: i64,
    pub item_name: String,
    pub item_type: String,
    pub last_service_date: String,
    pub service_interval_days: i64,
    pub notes: Option<String>,
    pub days_overdue: i64,
    pub progress_percent: i64,
}

// Most-overdue first; a row with an unreadable service date reads as
// healthy (days_overdue 0) instead of poisoning the list.
pub async fn list_maintenance(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaintenanceView>>, ApiError> {
    let today = Utc::now().date_naive();
    let items = queries::get_all_maintenance_items(&state.db)
        .await
        .map_err(db_error("list maintenance items"))?;

    let mut views: Vec<MaintenanceView> = items
        .into_iter()
        .map(|m| MaintenanceView {
            days_overdue: recurrence::days_overdue(
                &m.last_service_date,
                m.service_interval_days,
                today,
            ),
            progress_percent: recurrence::service_progress(
                &m.last_service_date,
                m.service_interval_days,
                today,
            ),
            item_id: m.item_id,
            item_name: m.item_name,
            item_type: m.item_type,
            last_service_date: m.last_service_date,
            service_interval_days: m.service_interval_days,
            notes: m.notes,
        })
        .collect();
    views.sort_by_key(|v| std::cmp::Reverse(v.days_overdue));

    Ok(Json(views))
}

pub async fn create_maintenance_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaintenanceItem>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if payload.item_type != "vehicle" && payload.item_type != "appliance" {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unknown item_type '{}'", payload.item_type),
        ));
    }

    let item_id = queries::create_maintenance_item(
        &state.db,
        &payload.item_name,
        &payload.item_type,
        payload.last_service_date,
        payload.service_interval_days,
        payload.notes.as_deref(),
    )
    .await
    .map_err(db_error("create maintenance item"))?;

    Ok((StatusCode::CREATED, Json(json!({ "item_id": item_id }))))
}

pub async fn log_service(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<LogService>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service_date = payload.service_date.unwrap_or_else(|| Utc::now().date_naive());
    let logged = queries::log_service(&state.db, item_id, service_date)
        .await
        .map_err(db_error("log service"))?;
    if logged {
        Ok(Json(json!({
            "item_id": item_id,
            "last_service_date": service_date.format("%Y-%m-%d").to_string(),
        })))
    } else {
        Err(not_found("maintenance item", item_id))
    }
}

pub async fn delete_maintenance_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = queries::delete_maintenance_item(&state.db, item_id)
        .await
        .map_err(db_error("delete maintenance item"))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("maintenance item", item_id))
    }
}

/*==========Shopping List===========*/

#[derive(Debug, Deserialize)]
pub struct CreateShoppingItem {
    pub item_name: String,
    pub quantity: Option<i64>,
}

pub async fn list_shopping(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShoppingItem>>, ApiError> {
    let items = queries::get_all_shopping_items(&state.db)
        .await
        .map_err(db_error("list shopping items"))?;
    Ok(Json(items))
}

pub async fn create_shopping_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateShoppingItem>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let item_id =
        queries::create_shopping_item(&state.db, &payload.item_name, payload.quantity.unwrap_or(1))
            .await
            .map_err(db_error("create shopping item"))?;
    Ok((StatusCode::CREATED, Json(json!({ "item_id": item_id }))))
}

pub async fn toggle_shopping_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let toggled = queries::toggle_shopping_item(&state.db, item_id)
        .await
        .map_err(db_error("toggle shopping item"))?;
    if toggled {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("shopping item", item_id))
    }
}

pub async fn clear_purchased(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = queries::clear_purchased(&state.db)
        .await
        .map_err(db_error("clear purchased items"))?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn delete_shopping_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = queries::delete_shopping_item(&state.db, item_id)
        .await
        .map_err(db_error("delete shopping item"))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("shopping item", item_id))
    }
}

/*==========Summary===========*/

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<String>, // 'YYYY-MM', defaults to the current month
}

#[derive(Debug, Serialize)]
pub struct CategorySplit {
    pub category: String,
    pub total: f64,
    pub percent: i64, // share of the month's expense total
}

#[derive(Debug, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    pub category_splits: Vec<CategorySplit>,
}

pub async fn month_summary(
    State(state): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<MonthSummary>, ApiError> {
    let month = match q.month {
        Some(m) => {
            validate_month(&m)?;
            m
        }
        None => Utc::now().date_naive().format("%Y-%m").to_string(),
    };

    let (income_total, expense_total) = queries::month_totals(&state.db, &month)
        .await
        .map_err(db_error("load month totals"))?;
    let spending = queries::month_category_spending(&state.db, &month)
        .await
        .map_err(db_error("load category spending"))?;

    let category_splits = spending
        .into_iter()
        .map(|c| CategorySplit {
            percent: if expense_total > 0.0 {
                (c.total_amount / expense_total * 100.0).round() as i64
            } else {
                0
            },
            total: c.total_amount,
            category: c.category,
        })
        .collect();

    Ok(Json(MonthSummary {
        month,
        income_total,
        expense_total,
        net: income_total - expense_total,
        category_splits,
    }))
}

fn validate_month(month: &str) -> Result<(), ApiError> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a YYYY-MM month", month),
        )
    })?;
    Ok(())
}
