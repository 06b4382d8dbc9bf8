//! Rutas de ventas (solo rol de ventas, lectura)

use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::sales_controller::SalesController;
use crate::dto::filter_dto::{RecordListParams, SalesSummaryParams};
use crate::dto::record_dto::RecordListResponse;
use crate::dto::sales_dto::SalesSummary;
use crate::middleware::auth::{auth_middleware, require_sales};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_sales_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/records", get(sales_records))
        .route("/summary", get(sales_summary))
        .route_layer(middleware::from_fn(require_sales))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn sales_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let controller = SalesController::new(state.pool.clone());
    Ok(Json(controller.list(params).await?))
}

async fn sales_summary(
    State(state): State<AppState>,
    Query(params): Query<SalesSummaryParams>,
) -> Result<Json<SalesSummary>, AppError> {
    let controller = SalesController::new(state.pool.clone());
    Ok(Json(controller.summary(params).await?))
}
