//! Rutas de exportación
//!
//! Mismos filtros que los listados, respuesta binaria con
//! `Content-Disposition: attachment`. Requiere token bearer.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName},
    middleware,
    routing::get,
    Router,
};

use crate::controllers::export_controller::{ExportController, ExportFormat};
use crate::dto::filter_dto::RecordListParams;
use crate::middleware::auth::{auth_middleware, require_maintenance, require_sales};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_export_router(state: AppState) -> Router<AppState> {
    let records = Router::new()
        .route("/records.csv", get(export_records_csv))
        .route("/records.xlsx", get(export_records_xlsx))
        .route("/records.pdf", get(export_records_pdf))
        .route_layer(middleware::from_fn(require_maintenance));

    let sales = Router::new()
        .route("/sales.csv", get(export_sales_csv))
        .route("/sales.xlsx", get(export_sales_xlsx))
        .route("/sales.pdf", get(export_sales_pdf))
        .route_layer(middleware::from_fn(require_sales));

    records
        .merge(sales)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

type ExportResponse = ([(HeaderName, String); 2], Vec<u8>);

async fn run_export(
    state: AppState,
    params: RecordListParams,
    basename: &str,
    format: ExportFormat,
) -> Result<ExportResponse, AppError> {
    let controller = ExportController::new(state.pool.clone(), &state.config);
    let file = controller.export(basename, format, params.filter_set()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", file.filename),
            ),
        ],
        file.bytes,
    ))
}

async fn export_records_csv(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "records", ExportFormat::Csv).await
}

async fn export_records_xlsx(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "records", ExportFormat::Xlsx).await
}

async fn export_records_pdf(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "records", ExportFormat::Pdf).await
}

async fn export_sales_csv(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "sales", ExportFormat::Csv).await
}

async fn export_sales_xlsx(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "sales", ExportFormat::Xlsx).await
}

async fn export_sales_pdf(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<ExportResponse, AppError> {
    run_export(state, params, "sales", ExportFormat::Pdf).await
}
