use sqlx::{Pool, Sqlite};
use rust_decimal::Decimal;
use sqlx::Row;
use chrono::NaiveDate;
use crate::database::models::{
    Category, CategorySpending, Debt, LedgerEntry, MaintenanceItem, RecurringBill, ShoppingItem,
};
use crate::recurrence;

/*
This file contains the specific SQL query,
CRUD (Create, Read, Update, Delete) logic
and is responsible for interacting with the database.

Money columns are stored as TEXT and parsed back into Decimal; date columns
are ISO date strings.
 */

/*==========Category Queries===========*/

// Fixed category set, inserted once at startup (INSERT OR IGNORE keeps reruns cheap)
pub async fn seed_fixed_categories(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    const FIXED: &[(&str, &str, &str)] = &[
        ("Salary", "INCOME", "💰"),
        ("Other Income", "INCOME", "🪙"),
        ("Groceries", "EXPENSE", "🛒"),
        ("Housing", "EXPENSE", "🏠"),
        ("Utilities", "EXPENSE", "💡"),
        ("Transport", "EXPENSE", "🚗"),
        ("Health", "EXPENSE", "🩺"),
        ("Entertainment", "EXPENSE", "🎬"),
        ("Debt Payment", "EXPENSE", "🏦"),
        ("Other", "EXPENSE", "📦"),
    ];

    for (name, ctype, icon) in FIXED {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories (category_name, category_type, icon)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(ctype)
        .bind(icon)
        .execute(pool)
        .await?;
    }
    Ok(())
}

pub async fn get_all_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT category_id, category_name, category_type, icon
        FROM categories
        ORDER BY category_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(Category {
            category_id: r.try_get("category_id")?,
            category_name: r.try_get("category_name")?,
            category_type: r.try_get("category_type")?,
            icon: r.try_get("icon")?,
        });
    }
    Ok(out)
}

pub async fn get_category_id(pool: &Pool<Sqlite>, name: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT category_id FROM categories WHERE category_name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/*==========Ledger Queries===========*/

// Create ledger entry (income or expense), returns the new row id
pub async fn create_ledger_entry(
    pool: &Pool<Sqlite>,
    category_id: Option<i64>,
    amount: &Decimal,
    is_expense: bool,
    description: Option<&str>,
    currency: &str,
    entry_date: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let entry_id = sqlx::query(
        r#"
        INSERT INTO ledger_entries (category_id, amount, is_expense, description, currency, entry_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        RETURNING entry_id
        "#,
    )
    .bind(category_id)
    .bind(amount.abs().to_string())
    .bind(is_expense)
    .bind(description)
    .bind(currency)
    .bind(entry_date.format("%Y-%m-%d").to_string())
    .fetch_one(pool)
    .await?
    .try_get("entry_id")?;

    Ok(entry_id)
}

// List entries, newest first; `month` is a 'YYYY-MM' prefix filter
pub async fn get_ledger_entries(
    pool: &Pool<Sqlite>,
    month: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<LedgerEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
          entry_id,
          category_id,
          amount,
          is_expense,
          description,
          currency,
          entry_date,
          created_at
        FROM ledger_entries
        WHERE (? IS NULL OR entry_date LIKE ? || '-%')
        ORDER BY entry_date DESC, entry_id DESC
        LIMIT COALESCE(?, 200)
        "#,
    )
    .bind(month)
    .bind(month)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(map_ledger_row(&r)?);
    }
    Ok(out)
}

pub async fn delete_ledger_entry(pool: &Pool<Sqlite>, entry_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ledger_entries WHERE entry_id = ?")
        .bind(entry_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/*==========Debt Queries===========*/

pub async fn create_debt(
    pool: &Pool<Sqlite>,
    debt_name: &str,
    balance: &Decimal,
    apr: &Decimal,
    minimum_payment: &Decimal,
    currency: &str,
) -> Result<i64, sqlx::Error> {
    let debt_id = sqlx::query(
        r#"
        INSERT INTO debts (debt_name, balance, apr, minimum_payment, currency, created_at)
        VALUES (?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        RETURNING debt_id
        "#,
    )
    .bind(debt_name)
    .bind(balance.to_string())
    .bind(apr.to_string())
    .bind(minimum_payment.to_string())
    .bind(currency)
    .fetch_one(pool)
    .await?
    .try_get("debt_id")?;

    Ok(debt_id)
}

pub async fn get_all_debts(pool: &Pool<Sqlite>) -> Result<Vec<Debt>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT debt_id, debt_name, balance, apr, minimum_payment, currency, created_at
        FROM debts
        ORDER BY debt_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(Debt {
            debt_id: r.try_get("debt_id")?,
            debt_name: r.try_get("debt_name")?,
            balance: parse_money(&r.try_get::<String, _>("balance")?)?,
            apr: parse_money(&r.try_get::<String, _>("apr")?)?,
            minimum_payment: parse_money(&r.try_get::<String, _>("minimum_payment")?)?,
            currency: r.try_get("currency")?,
            created_at: r.try_get("created_at")?,
        });
    }
    Ok(out)
}

// Record a payment: reduces the balance and writes the matching ledger
// entry in one transaction. Returns false when the debt id does not exist.
pub async fn record_debt_payment(
    pool: &Pool<Sqlite>,
    debt_id: i64,
    amount: &Decimal,
    payment_date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT debt_name, balance, currency FROM debts WHERE debt_id = ?")
        .bind(debt_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(row) = row else {
        return Ok(false);
    };

    let debt_name: String = row.try_get("debt_name")?;
    let currency: String = row.try_get("currency")?;
    let balance = parse_money(&row.try_get::<String, _>("balance")?)?;
    let new_balance = balance - amount.abs();

    sqlx::query("UPDATE debts SET balance = ? WHERE debt_id = ?")
        .bind(new_balance.to_string())
        .bind(debt_id)
        .execute(&mut *tx)
        .await?;

    let category_id: Option<i64> =
        sqlx::query_scalar("SELECT category_id FROM categories WHERE category_name = 'Debt Payment'")
            .fetch_optional(&mut *tx)
            .await?;

    sqlx::query(
        r#"
        INSERT INTO ledger_entries (category_id, amount, is_expense, description, currency, entry_date, created_at)
        VALUES (?, ?, 1, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        "#,
    )
    .bind(category_id)
    .bind(amount.abs().to_string())
    .bind(format!("{} payment", debt_name))
    .bind(currency)
    .bind(payment_date.format("%Y-%m-%d").to_string())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn delete_debt(pool: &Pool<Sqlite>, debt_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM debts WHERE debt_id = ?")
        .bind(debt_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/*==========Recurring Bill Queries===========*/

pub async fn create_bill(
    pool: &Pool<Sqlite>,
    bill_name: &str,
    amount: &Decimal,
    day_of_month: i64,
    category_id: Option<i64>,
    currency: &str,
) -> Result<i64, sqlx::Error> {
    let bill_id = sqlx::query(
        r#"
        INSERT INTO recurring_bills (bill_name, amount, day_of_month, category_id, currency, created_at)
        VALUES (?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        RETURNING bill_id
        "#,
    )
    .bind(bill_name)
    .bind(amount.to_string())
    .bind(day_of_month.clamp(1, 31))
    .bind(category_id)
    .bind(currency)
    .fetch_one(pool)
    .await?
    .try_get("bill_id")?;

    Ok(bill_id)
}

pub async fn get_all_bills(pool: &Pool<Sqlite>) -> Result<Vec<RecurringBill>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT bill_id, bill_name, amount, day_of_month, category_id, currency, created_at
        FROM recurring_bills
        ORDER BY bill_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(map_bill_row(&r)?);
    }
    Ok(out)
}

pub async fn get_bill_by_id(
    pool: &Pool<Sqlite>,
    bill_id: i64,
) -> Result<Option<RecurringBill>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT bill_id, bill_name, amount, day_of_month, category_id, currency, created_at
        FROM recurring_bills
        WHERE bill_id = ?
        "#,
    )
    .bind(bill_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => Ok(Some(map_bill_row(&r)?)),
        None => Ok(None),
    }
}

pub async fn delete_bill(pool: &Pool<Sqlite>, bill_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recurring_bills WHERE bill_id = ?")
        .bind(bill_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/*==========Maintenance Queries===========*/

pub async fn create_maintenance_item(
    pool: &Pool<Sqlite>,
    item_name: &str,
    item_type: &str,
    last_service_date: NaiveDate,
    service_interval_days: i64,
    notes: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let item_id = sqlx::query(
        r#"
        INSERT INTO maintenance_items (item_name, item_type, last_service_date, service_interval_days, notes, created_at)
        VALUES (?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        RETURNING item_id
        "#,
    )
    .bind(item_name)
    .bind(item_type)
    .bind(last_service_date.format("%Y-%m-%d").to_string())
    .bind(service_interval_days)
    .bind(notes)
    .fetch_one(pool)
    .await?
    .try_get("item_id")?;

    Ok(item_id)
}

pub async fn get_all_maintenance_items(
    pool: &Pool<Sqlite>,
) -> Result<Vec<MaintenanceItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT item_id, item_name, item_type, last_service_date, service_interval_days, notes, created_at
        FROM maintenance_items
        ORDER BY item_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(MaintenanceItem {
            item_id: r.try_get("item_id")?,
            item_name: r.try_get("item_name")?,
            item_type: r.try_get("item_type")?,
            last_service_date: r.try_get("last_service_date")?,
            service_interval_days: r.try_get("service_interval_days")?,
            notes: r.try_get("notes")?,
            created_at: r.try_get("created_at")?,
        });
    }
    Ok(out)
}

// Log a completed service: the interval restarts from `service_date`
pub async fn log_service(
    pool: &Pool<Sqlite>,
    item_id: i64,
    service_date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE maintenance_items SET last_service_date = ? WHERE item_id = ?")
        .bind(service_date.format("%Y-%m-%d").to_string())
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_maintenance_item(pool: &Pool<Sqlite>, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM maintenance_items WHERE item_id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/*==========Shopping Queries===========*/

pub async fn create_shopping_item(
    pool: &Pool<Sqlite>,
    item_name: &str,
    quantity: i64,
) -> Result<i64, sqlx::Error> {
    let item_id = sqlx::query(
        r#"
        INSERT INTO shopping_items (item_name, quantity, purchased, added_at)
        VALUES (?, ?, 0, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        RETURNING item_id
        "#,
    )
    .bind(item_name)
    .bind(quantity.max(1))
    .fetch_one(pool)
    .await?
    .try_get("item_id")?;

    Ok(item_id)
}

// Unpurchased first, then insertion order
pub async fn get_all_shopping_items(pool: &Pool<Sqlite>) -> Result<Vec<ShoppingItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT item_id, item_name, quantity, purchased, added_at
        FROM shopping_items
        ORDER BY purchased ASC, item_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        let purchased: i64 = r.try_get("purchased")?;
        out.push(ShoppingItem {
            item_id: r.try_get("item_id")?,
            item_name: r.try_get("item_name")?,
            quantity: r.try_get("quantity")?,
            purchased: purchased != 0,
            added_at: r.try_get("added_at")?,
        });
    }
    Ok(out)
}

pub async fn toggle_shopping_item(pool: &Pool<Sqlite>, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE shopping_items SET purchased = 1 - purchased WHERE item_id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear_purchased(pool: &Pool<Sqlite>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shopping_items WHERE purchased = 1")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_shopping_item(pool: &Pool<Sqlite>, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shopping_items WHERE item_id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/*==========Summary Queries===========*/

// Month totals as (income, expense); `month` is 'YYYY-MM'
pub async fn month_totals(pool: &Pool<Sqlite>, month: &str) -> Result<(f64, f64), sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
          CAST(COALESCE(SUM(CASE WHEN is_expense = 0 THEN CAST(amount AS NUMERIC) ELSE 0 END), 0) AS REAL) AS income,
          CAST(COALESCE(SUM(CASE WHEN is_expense = 1 THEN CAST(amount AS NUMERIC) ELSE 0 END), 0) AS REAL) AS expense
        FROM ledger_entries
        WHERE entry_date LIKE ? || '-%'
        "#,
    )
    .bind(month)
    .fetch_one(pool)
    .await?;

    Ok((row.try_get("income")?, row.try_get("expense")?))
}

pub async fn month_category_spending(
    pool: &Pool<Sqlite>,
    month: &str,
) -> Result<Vec<CategorySpending>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
          COALESCE(c.category_name, 'Uncategorized') AS category,
          CAST(ROUND(SUM(CAST(e.amount AS NUMERIC)), 2) AS REAL) AS total_amount
        FROM ledger_entries e
        LEFT JOIN categories c ON c.category_id = e.category_id
        WHERE e.is_expense = 1
          AND e.entry_date LIKE ? || '-%'
        GROUP BY category
        ORDER BY total_amount DESC
        "#,
    )
    .bind(month)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(CategorySpending {
            category: r.try_get("category")?,
            total_amount: r.try_get("total_amount")?,
        });
    }
    Ok(out)
}

/*==========Row helpers===========*/

fn map_ledger_row(r: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry, sqlx::Error> {
    let is_expense: i64 = r.try_get("is_expense")?;
    let entry_date_s: String = r.try_get("entry_date")?;
    Ok(LedgerEntry {
        entry_id: r.try_get("entry_id")?,
        category_id: r.try_get("category_id")?,
        amount: parse_money(&r.try_get::<String, _>("amount")?)?,
        is_expense: is_expense != 0,
        description: r.try_get("description")?,
        currency: r.try_get("currency")?,
        entry_date: recurrence::parse_date(&entry_date_s)
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        created_at: r.try_get("created_at")?,
    })
}

fn map_bill_row(r: &sqlx::sqlite::SqliteRow) -> Result<RecurringBill, sqlx::Error> {
    Ok(RecurringBill {
        bill_id: r.try_get("bill_id")?,
        bill_name: r.try_get("bill_name")?,
        amount: parse_money(&r.try_get::<String, _>("amount")?)?,
        day_of_month: r.try_get("day_of_month")?,
        category_id: r.try_get("category_id")?,
        currency: r.try_get("currency")?,
        created_at: r.try_get("created_at")?,
    })
}

fn parse_money(s: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str_exact(s)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format: {}", e).into()))
}
