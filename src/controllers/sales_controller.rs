//! Controlador de ventas
//!
//! Vistas de solo lectura para el rol de ventas: listado con rango de
//! fechas y resumen agregado.

use sqlx::PgPool;

use crate::dto::filter_dto::{RecordListParams, SalesSummaryParams};
use crate::dto::record_dto::{RecordListResponse, RecordResponse};
use crate::dto::sales_dto::SalesSummary;
use crate::repositories::record_repository::RecordRepository;
use crate::services::sales_summary_service;
use crate::utils::errors::AppError;

pub struct SalesController {
    repository: RecordRepository,
}

impl SalesController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RecordRepository::new(pool),
        }
    }

    /// Listado de ventas; a diferencia del de mantenimiento sí respeta
    /// `date_from` / `date_to`
    pub async fn list(&self, params: RecordListParams) -> Result<RecordListResponse, AppError> {
        let filters = params.filter_set();
        let window = params.page_window();

        let (records, total) = self
            .repository
            .search(&filters, &window, &params.sort_by, params.sort_desc)
            .await?;

        Ok(RecordListResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
            total,
            page: window.page,
            page_size: window.page_size,
        })
    }

    /// Resumen de ventas sobre los registros que cumplen los filtros
    pub async fn summary(&self, params: SalesSummaryParams) -> Result<SalesSummary, AppError> {
        let filters = params.filter_set();
        let records = self.repository.find_all_filtered(&filters).await?;

        Ok(sales_summary_service::build_sales_summary(&records))
    }
}
