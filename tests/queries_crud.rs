//! Query-layer tests against an in-memory SQLite database.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

use homeledger::database::db::queries;

async fn test_pool() -> Pool<Sqlite> {
    // one connection keeps the in-memory database alive for the whole test
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    queries::seed_fixed_categories(&pool).await.expect("seed categories");
    pool
}

fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn category_seed_is_idempotent() {
    let pool = test_pool().await;
    let first = queries::get_all_categories(&pool).await.unwrap();
    queries::seed_fixed_categories(&pool).await.unwrap();
    let second = queries::get_all_categories(&pool).await.unwrap();
    assert!(!first.is_empty());
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn ledger_create_list_delete() {
    let pool = test_pool().await;
    let groceries = queries::get_category_id(&pool, "Groceries").await.unwrap();
    assert!(groceries.is_some());

    let entry_id = queries::create_ledger_entry(
        &pool,
        groceries,
        &money("58.20"),
        true,
        Some("weekly shop"),
        "USD",
        date(2024, 5, 10),
    )
    .await
    .unwrap();
    assert!(entry_id > 0);

    let entries = queries::get_ledger_entries(&pool, Some("2024-05"), None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, money("58.20"));
    assert!(entries[0].is_expense);
    assert_eq!(entries[0].entry_date, date(2024, 5, 10));

    // a different month filter excludes it
    let other = queries::get_ledger_entries(&pool, Some("2024-06"), None).await.unwrap();
    assert!(other.is_empty());

    assert!(queries::delete_ledger_entry(&pool, entry_id).await.unwrap());
    assert!(!queries::delete_ledger_entry(&pool, entry_id).await.unwrap());
}

#[tokio::test]
async fn debt_payment_reduces_balance_and_writes_ledger() {
    let pool = test_pool().await;
    let debt_id = queries::create_debt(
        &pool,
        "Visa",
        &money("500.00"),
        &money("19.99"),
        &money("25.00"),
        "USD",
    )
    .await
    .unwrap();

    let recorded = queries::record_debt_payment(&pool, debt_id, &money("120.50"), date(2024, 5, 3))
        .await
        .unwrap();
    assert!(recorded);

    let debts = queries::get_all_debts(&pool).await.unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].balance, money("379.50"));

    let entries = queries::get_ledger_entries(&pool, Some("2024-05"), None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, money("120.50"));
    assert!(entries[0].is_expense);
    assert_eq!(entries[0].description.as_deref(), Some("Visa payment"));

    // unknown debt id records nothing
    let missing = queries::record_debt_payment(&pool, 9999, &money("10"), date(2024, 5, 4))
        .await
        .unwrap();
    assert!(!missing);
}

#[tokio::test]
async fn bill_day_of_month_is_clamped_on_create() {
    let pool = test_pool().await;
    let bill_id = queries::create_bill(&pool, "Internet", &money("80.00"), 42, None, "USD")
        .await
        .unwrap();

    let bill = queries::get_bill_by_id(&pool, bill_id).await.unwrap().unwrap();
    assert_eq!(bill.day_of_month, 31);
    assert_eq!(bill.amount, money("80.00"));

    let low = queries::create_bill(&pool, "Phone", &money("35.00"), -3, None, "USD")
        .await
        .unwrap();
    let bill = queries::get_bill_by_id(&pool, low).await.unwrap().unwrap();
    assert_eq!(bill.day_of_month, 1);

    assert!(queries::delete_bill(&pool, bill_id).await.unwrap());
    assert!(queries::get_bill_by_id(&pool, bill_id).await.unwrap().is_none());
}

#[tokio::test]
async fn log_service_moves_the_anchor_date() {
    let pool = test_pool().await;
    let item_id = queries::create_maintenance_item(
        &pool,
        "Furnace filter",
        "appliance",
        date(2024, 1, 1),
        90,
        None,
    )
    .await
    .unwrap();

    assert!(queries::log_service(&pool, item_id, date(2024, 4, 2)).await.unwrap());

    let items = queries::get_all_maintenance_items(&pool).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].last_service_date, "2024-04-02");

    assert!(!queries::log_service(&pool, 9999, date(2024, 4, 2)).await.unwrap());
}

#[tokio::test]
async fn shopping_toggle_and_clear() {
    let pool = test_pool().await;
    let milk = queries::create_shopping_item(&pool, "Milk", 1).await.unwrap();
    let eggs = queries::create_shopping_item(&pool, "Eggs", 12).await.unwrap();

    assert!(queries::toggle_shopping_item(&pool, milk).await.unwrap());

    // purchased items sort after unpurchased ones
    let items = queries::get_all_shopping_items(&pool).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_id, eggs);
    assert!(!items[0].purchased);
    assert!(items[1].purchased);

    let removed = queries::clear_purchased(&pool).await.unwrap();
    assert_eq!(removed, 1);
    let items = queries::get_all_shopping_items(&pool).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_name, "Eggs");
}

#[tokio::test]
async fn month_totals_and_category_splits() {
    let pool = test_pool().await;
    let salary = queries::get_category_id(&pool, "Salary").await.unwrap();
    let groceries = queries::get_category_id(&pool, "Groceries").await.unwrap();
    let housing = queries::get_category_id(&pool, "Housing").await.unwrap();

    queries::create_ledger_entry(&pool, salary, &money("3000.00"), false, None, "USD", date(2024, 5, 1))
        .await
        .unwrap();
    queries::create_ledger_entry(&pool, groceries, &money("100.00"), true, None, "USD", date(2024, 5, 8))
        .await
        .unwrap();
    queries::create_ledger_entry(&pool, housing, &money("300.00"), true, None, "USD", date(2024, 5, 15))
        .await
        .unwrap();
    // outside the month, must not count
    queries::create_ledger_entry(&pool, housing, &money("999.00"), true, None, "USD", date(2024, 6, 1))
        .await
        .unwrap();

    let (income, expense) = queries::month_totals(&pool, "2024-05").await.unwrap();
    assert!((income - 3000.0).abs() < 1e-9);
    assert!((expense - 400.0).abs() < 1e-9);

    let spending = queries::month_category_spending(&pool, "2024-05").await.unwrap();
    assert_eq!(spending.len(), 2);
    assert_eq!(spending[0].category, "Housing");
    assert!((spending[0].total_amount - 300.0).abs() < 1e-9);
    assert_eq!(spending[1].category, "Groceries");
    assert!((spending[1].total_amount - 100.0).abs() < 1e-9);

    let (income, expense) = queries::month_totals(&pool, "2030-01").await.unwrap();
    assert!((income - 0.0).abs() < 1e-9);
    assert!((expense - 0.0).abs() < 1e-9);
}
