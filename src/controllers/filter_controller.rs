//! Controlador de opciones de filtros
//!
//! Devuelve los valores distintos de cada campo categórico para poblar
//! los desplegables de filtros.

use sqlx::PgPool;

use crate::dto::filter_dto::FilterOptionsResponse;
use crate::repositories::record_repository::{FilterColumn, RecordRepository};
use crate::utils::errors::AppError;

pub struct FilterController {
    repository: RecordRepository,
}

impl FilterController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RecordRepository::new(pool),
        }
    }

    pub async fn options(&self) -> Result<FilterOptionsResponse, AppError> {
        Ok(FilterOptionsResponse {
            zones: self.repository.distinct_values(FilterColumn::Zone).await?,
            capacity_kw: self
                .repository
                .distinct_values(FilterColumn::CapacityKw)
                .await?,
            heaters: self.repository.distinct_values(FilterColumn::Heater).await?,
            controllers: self
                .repository
                .distinct_values(FilterColumn::Controller)
                .await?,
            cards: self.repository.distinct_values(FilterColumn::Card).await?,
            bodies: self.repository.distinct_values(FilterColumn::Body).await?,
            sold_by: self.repository.distinct_values(FilterColumn::SoldBy).await?,
            lead_sources: self
                .repository
                .distinct_values(FilterColumn::LeadSource)
                .await?,
        })
    }
}
