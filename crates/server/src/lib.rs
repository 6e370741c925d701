pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod telemetry;

use axum::Router;
use hearth_core::{BudgetPlanService, CashflowService};
use hearth_storage::{DbPool, SqliteStore};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Shared by every handler. Cloning is cheap: both services wrap the same connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DbPool,
    pub cashflow: CashflowService<SqliteStore>,
    pub budgets: BudgetPlanService<SqliteStore>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        let store = SqliteStore::new(pool.clone());
        AppState {
            db: pool,
            cashflow: CashflowService::new(store.clone()),
            budgets: BudgetPlanService::new(store),
        }
    }
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = routes::api_routes()
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if config.cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
