//! Rutas de registros (solo rol de mantenimiento)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::record_controller::RecordController;
use crate::dto::filter_dto::{
    ClientHistoryParams, ExpiringSoonParams, PaginationParams, RecordListParams,
    WarrantySummaryParams,
};
use crate::dto::record_dto::{
    CreateRecordRequest, RecordListResponse, RecordResponse, UpdateRecordRequest,
};
use crate::dto::warranty_dto::WarrantySummary;
use crate::middleware::auth::{auth_middleware, require_maintenance};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_record_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_record).get(list_records))
        .route("/warranty/summary", get(warranty_summary))
        .route("/warranty/out-of-warranty", get(out_of_warranty))
        .route("/warranty/expiring-soon", get(expiring_soon))
        .route("/history/:client_phone", get(client_history))
        .route(
            "/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .route_layer(middleware::from_fn(require_maintenance))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecordResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.list(params).await?))
}

async fn client_history(
    State(state): State<AppState>,
    Path(client_phone): Path<String>,
    Query(params): Query<ClientHistoryParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.client_history(&client_phone, params).await?))
}

async fn out_of_warranty(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.out_of_warranty(params).await?))
}

async fn expiring_soon(
    State(state): State<AppState>,
    Query(params): Query<ExpiringSoonParams>,
) -> Result<Json<RecordListResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.expiring_soon(params).await?))
}

async fn warranty_summary(
    State(state): State<AppState>,
    Query(params): Query<WarrantySummaryParams>,
) -> Result<Json<WarrantySummary>, AppError> {
    let controller = RecordController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.warranty_summary(params).await?))
}
