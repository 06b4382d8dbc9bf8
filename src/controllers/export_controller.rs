//! Controlador de exportaciones
//!
//! Exporta los registros que cumplen los filtros activos, sin paginar
//! (con tope de filas configurable). Mismo conjunto de filtros que los
//! listados; la respuesta cambia solo de codificación.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::models::filters::{FilterSet, PageWindow};
use crate::repositories::record_repository::RecordRepository;
use crate::services::export_service;
use crate::utils::errors::AppError;

/// Formato de exportación pedido por extensión de la ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Fichero de exportación listo para servir
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct ExportController {
    repository: RecordRepository,
    row_cap: i64,
}

impl ExportController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: RecordRepository::new(pool),
            row_cap: config.export_row_cap,
        }
    }

    pub async fn export(
        &self,
        basename: &str,
        format: ExportFormat,
        filters: FilterSet,
    ) -> Result<ExportFile, AppError> {
        let window = PageWindow {
            page: 1,
            page_size: u32::try_from(self.row_cap.max(1)).unwrap_or(u32::MAX),
        };

        let (records, total) = self
            .repository
            .search(&filters, &window, "date_of_delivery", true)
            .await?;

        if total > self.row_cap {
            log::warn!(
                "📤 Exportación truncada: {} filas coinciden y el tope es {}",
                total,
                self.row_cap
            );
        }

        let bytes = match format {
            ExportFormat::Csv => export_service::records_to_csv(&records).into_bytes(),
            ExportFormat::Xlsx => export_service::records_to_xlsx(&records)?,
            ExportFormat::Pdf => {
                return Err(AppError::NotImplemented(
                    "La exportación a PDF no está disponible".to_string(),
                ))
            }
        };

        log::info!(
            "📤 Exportación generada: {}.{} ({} filas)",
            basename,
            format.extension(),
            records.len()
        );

        Ok(ExportFile {
            filename: format!("{}.{}", basename, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(
            ExportFormat::Xlsx.content_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}
