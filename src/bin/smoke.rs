
use dotenvy::dotenv;
use homeledger::database::db::connection::get_db_pool;
use homeledger::database::db::queries;
use homeledger::recurrence;

use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    /* ==========Smoke run against the configured database========== */
    let pool = get_db_pool().await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    println!("Migrations ran successfully!");

    queries::seed_fixed_categories(&pool).await?;
    let categories = queries::get_all_categories(&pool).await?;
    println!("Seeded {} categories", categories.len());
    assert!(!categories.is_empty(), "category seed produced no rows");

    let today = Utc::now().date_naive();

    // ----------------------------------------------------
    // LEDGER
    // ----------------------------------------------------
    println!("\n--- Testing: create_ledger_entry ---");
    let groceries = queries::get_category_id(&pool, "Groceries").await?;
    let amount = Decimal::from_str("42.75")?;
    let entry_id = queries::create_ledger_entry(
        &pool,
        groceries,
        &amount,
        true,
        Some("smoke test groceries"),
        "USD",
        today,
    )
    .await?;
    println!("   > Ledger entry created: {}", entry_id);
    assert!(entry_id > 0, "Failed to create ledger entry, ID invalid.");

    let month = today.format("%Y-%m").to_string();
    let entries = queries::get_ledger_entries(&pool, Some(&month), None).await?;
    println!("   > Entries this month: {}", entries.len());
    assert!(entries.iter().any(|e| e.entry_id == entry_id));

    // ----------------------------------------------------
    // RECURRING BILLS
    // ----------------------------------------------------
    println!("\n--- Testing: create_bill / due-date derivation ---");
    let rent = Decimal::from_str("1650.00")?;
    let bill_id = queries::create_bill(&pool, "Rent", &rent, 1, None, "USD").await?;
    println!("   > Bill created: {}", bill_id);

    for bill in queries::get_all_bills(&pool).await? {
        let next_due = recurrence::next_due_date(bill.day_of_month, today);
        let remaining = recurrence::days_remaining(next_due, today);
        println!("   > {} due {} ({} days)", bill.bill_name, next_due, remaining);
        assert!(remaining >= 0, "derived due date is in the past");
    }

    // ----------------------------------------------------
    // MAINTENANCE
    // ----------------------------------------------------
    println!("\n--- Testing: maintenance overdue derivation ---");
    let last_service = today - chrono::Duration::days(100);
    let item_id = queries::create_maintenance_item(
        &pool,
        "Car - oil change",
        "vehicle",
        last_service,
        90,
        Some("smoke test item"),
    )
    .await?;
    println!("   > Maintenance item created: {}", item_id);

    let items = queries::get_all_maintenance_items(&pool).await?;
    let item = items
        .iter()
        .find(|m| m.item_id == item_id)
        .expect("created item missing from list");
    let overdue = recurrence::days_overdue(&item.last_service_date, item.service_interval_days, today);
    println!("   > Overdue by {} days", overdue);
    assert_eq!(overdue, 10, "100 days elapsed on a 90-day interval");

    println!("\n--- Testing: log_service resets the interval ---");
    assert!(queries::log_service(&pool, item_id, today).await?);
    let items = queries::get_all_maintenance_items(&pool).await?;
    let item = items.iter().find(|m| m.item_id == item_id).unwrap();
    let overdue = recurrence::days_overdue(&item.last_service_date, item.service_interval_days, today);
    assert_eq!(overdue, -90, "freshly serviced item should have the full interval left");

    // ----------------------------------------------------
    // SHOPPING LIST
    // ----------------------------------------------------
    println!("\n--- Testing: shopping list ---");
    let milk = queries::create_shopping_item(&pool, "Milk", 2).await?;
    assert!(queries::toggle_shopping_item(&pool, milk).await?);
    let removed = queries::clear_purchased(&pool).await?;
    println!("   > Cleared {} purchased item(s)", removed);
    assert!(removed >= 1, "purchased item was not cleared");

    // ----------------------------------------------------
    // CLEANUP
    // ----------------------------------------------------
    queries::delete_bill(&pool, bill_id).await?;
    queries::delete_maintenance_item(&pool, item_id).await?;
    queries::delete_ledger_entry(&pool, entry_id).await?;
    println!("\nSmoke run complete.");

    Ok(())
}
