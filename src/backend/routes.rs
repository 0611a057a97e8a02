use axum::{
    routing::{delete, get, post},
    Router,
};
use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route(
            "/api/ledger",
            get(handlers::list_ledger).post(handlers::create_ledger_entry),
        )
        .route("/api/ledger/{id}", delete(handlers::delete_ledger_entry))
        .route(
            "/api/debts",
            get(handlers::list_debts).post(handlers::create_debt),
        )
        .route("/api/debts/{id}", delete(handlers::delete_debt))
        .route("/api/debts/{id}/payments", post(handlers::record_debt_payment))
        .route(
            "/api/bills",
            get(handlers::list_bills).post(handlers::create_bill),
        )
        .route("/api/bills/{id}", delete(handlers::delete_bill))
        .route("/api/bills/{id}/pay", post(handlers::pay_bill))
        .route(
            "/api/maintenance",
            get(handlers::list_maintenance).post(handlers::create_maintenance_item),
        )
        .route("/api/maintenance/{id}", delete(handlers::delete_maintenance_item))
        .route("/api/maintenance/{id}/service", post(handlers::log_service))
        .route(
            "/api/shopping",
            get(handlers::list_shopping).post(handlers::create_shopping_item),
        )
        .route("/api/shopping/purchased", delete(handlers::clear_purchased))
        .route("/api/shopping/{id}", delete(handlers::delete_shopping_item))
        .route("/api/shopping/{id}/toggle", post(handlers::toggle_shopping_item))
        .route("/api/summary", get(handlers::month_summary))
}
