//! Controlador de registros
//!
//! Orquesta el ciclo CRUD de mantenimiento, los listados filtrados y los
//! informes de garantía. El estado de garantía se deriva en cada lectura
//! con el reloj actual; nunca se persiste.

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::filter_dto::{
    ClientHistoryParams, ExpiringSoonParams, PaginationParams, RecordListParams,
    WarrantySummaryParams,
};
use crate::dto::record_dto::{
    CreateRecordRequest, RecordListResponse, RecordResponse, UpdateRecordRequest,
};
use crate::dto::warranty_dto::WarrantySummary;
use crate::services::warranty_service;
use crate::utils::errors::AppError;
use crate::repositories::record_repository::RecordRepository;

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 50;

pub struct RecordController {
    repository: RecordRepository,
    config: EnvironmentConfig,
}

impl RecordController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: RecordRepository::new(pool),
            config,
        }
    }

    pub async fn create(&self, request: CreateRecordRequest) -> Result<RecordResponse, AppError> {
        request.validate()?;

        // Código legible: se respeta el informado si está libre, si no se genera
        let record_code = match request.record_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                if self.repository.record_code_exists(code).await? {
                    return Err(AppError::Conflict(format!(
                        "El código de registro '{}' ya existe",
                        code
                    )));
                }
                code.to_string()
            }
            _ => self.repository.next_record_code().await?,
        };

        let record = self.repository.create(record_code, &request).await?;
        log::info!("📄 Registro creado: {} ({})", record.record_code, record.client_name);

        Ok(RecordResponse::from(record))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<RecordResponse, AppError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;

        Ok(RecordResponse::from(record))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateRecordRequest,
    ) -> Result<RecordResponse, AppError> {
        request.validate()?;

        if let Some(code) = request.record_code.as_deref() {
            // No pisar el código de otro registro
            if let Some(existing) = self.repository.find_by_id(id).await? {
                if existing.record_code != code && self.repository.record_code_exists(code).await? {
                    return Err(AppError::Conflict(format!(
                        "El código de registro '{}' ya existe",
                        code
                    )));
                }
            }
        }

        let record = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;

        Ok(RecordResponse::from(record))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Registro no encontrado".to_string()));
        }
        log::info!("🗑️ Registro {} eliminado", id);
        Ok(())
    }

    /// Listado de mantenimiento con búsqueda, filtros y paginación
    ///
    /// El rango de fechas se descarta en esta vista aunque venga en la query.
    pub async fn list(&self, params: RecordListParams) -> Result<RecordListResponse, AppError> {
        let mut filters = params.filter_set();
        filters.date_from = None;
        filters.date_to = None;

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

    /// Historial de registros del mismo cliente (teléfono exacto)
    pub async fn client_history(
        &self,
        client_phone: &str,
        params: ClientHistoryParams,
    ) -> Result<RecordListResponse, AppError> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let records = self
            .repository
            .find_by_client_phone(client_phone, params.exclude_id, limit)
            .await?;

        let total = records.len() as i64;
        let page_size = u32::try_from(total.max(1)).unwrap_or(1);

        Ok(RecordListResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
            total,
            page: 1,
            page_size,
        })
    }

    pub async fn out_of_warranty(
        &self,
        params: PaginationParams,
    ) -> Result<RecordListResponse, AppError> {
        let window = params.page_window();
        let (records, total) = self.repository.find_out_of_warranty(&window).await?;

        Ok(RecordListResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
            total,
            page: window.page,
            page_size: window.page_size,
        })
    }

    pub async fn expiring_soon(
        &self,
        params: ExpiringSoonParams,
    ) -> Result<RecordListResponse, AppError> {
        // sin `days` en la query se usa el umbral configurado
        let days = warranty_service::clamp_expiring_soon_days(
            params.days.or(Some(self.config.expiring_soon_days)),
        );
        let window = params.page_window();
        let (records, total) = self.repository.find_expiring_soon(days, &window).await?;

        Ok(RecordListResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
            total,
            page: window.page,
            page_size: window.page_size,
        })
    }

    /// Resumen de garantías calculado con el umbral pedido
    ///
    /// Los conteos pasan por el mismo cálculo que las etiquetas de los
    /// listados para que ambos coincidan siempre.
    pub async fn warranty_summary(
        &self,
        params: WarrantySummaryParams,
    ) -> Result<WarrantySummary, AppError> {
        let days = warranty_service::clamp_expiring_soon_days(
            params.days.or(Some(self.config.expiring_soon_days)),
        );
        let dates = self.repository.delivery_dates().await?;
        let today = Utc::now().date_naive();

        Ok(warranty_service::summarize(&dates, today, days))
    }
}
