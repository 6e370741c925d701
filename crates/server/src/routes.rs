use axum::routing::{delete, get};
use axum::Router;

use crate::handlers;
use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/cashflow/monthly", get(handlers::monthly_cashflow))
        .route("/api/cashflow/range", get(handlers::range_cashflow))
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/api/v1/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/api/v1/budgets/{id}",
            get(handlers::get_budget).delete(handlers::delete_budget),
        )
        .route(
            "/api/households",
            get(handlers::list_households).post(handlers::create_household),
        )
        .route("/api/households/{id}", get(handlers::get_household))
        .route(
            "/api/households/{id}/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route(
            "/api/households/{id}/cards",
            get(handlers::list_cards).post(handlers::add_card),
        )
        .route(
            "/api/households/{id}/fixed-costs",
            get(handlers::list_fixed_costs).post(handlers::add_fixed_cost),
        )
        .route(
            "/api/households/{id}/salaries",
            get(handlers::list_salaries).post(handlers::add_salary),
        )
        .route("/api/fixed-costs/{id}", delete(handlers::delete_fixed_cost))
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/card-statements",
            get(handlers::list_statements).post(handlers::create_statement),
        )
        .route("/api/card-statements/{id}", get(handlers::get_statement))
}
