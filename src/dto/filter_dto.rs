//! DTOs de filtros y parámetros de query
//!
//! Los parámetros llegan dispersos por query string y se convierten en un
//! `FilterSet` normalizado más una `PageWindow` en el borde de la API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::filters::{FilterSet, PageWindow};

pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    "date_of_delivery".to_string()
}

fn default_sort_desc() -> bool {
    true
}

/// Parámetros de query de los listados de registros
///
/// El rango de fechas solo se respeta en el listado de ventas; el listado
/// de mantenimiento lo descarta aunque venga en la query.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordListParams {
    pub search: Option<String>,
    pub zone: Option<String>,
    pub capacity_kw: Option<String>,
    pub heater: Option<String>,
    pub controller: Option<String>,
    pub card: Option<String>,
    pub body: Option<String>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,

    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_desc")]
    pub sort_desc: bool,
}

impl RecordListParams {
    /// Filtros normalizados (strings vacíos fuera)
    pub fn filter_set(&self) -> FilterSet {
        FilterSet {
            search: self.search.clone(),
            zone: self.zone.clone(),
            capacity_kw: self.capacity_kw.clone(),
            heater: self.heater.clone(),
            controller: self.controller.clone(),
            card: self.card.clone(),
            body: self.body.clone(),
            sold_by: self.sold_by.clone(),
            lead_source: self.lead_source.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
        }
        .normalized()
    }

    /// Ventana de paginación con los límites de la API
    pub fn page_window(&self) -> PageWindow {
        PageWindow {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Parámetros de paginación simples (sub-listados de garantía)
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl PaginationParams {
    pub fn page_window(&self) -> PageWindow {
        PageWindow {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Parámetros del sub-listado "por vencer"
#[derive(Debug, Clone, Deserialize)]
pub struct ExpiringSoonParams {
    pub days: Option<u32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl ExpiringSoonParams {
    pub fn page_window(&self) -> PageWindow {
        PageWindow {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Parámetros del resumen de garantías
#[derive(Debug, Clone, Deserialize)]
pub struct WarrantySummaryParams {
    pub days: Option<u32>,
}

/// Parámetros del historial por teléfono de cliente
#[derive(Debug, Clone, Deserialize)]
pub struct ClientHistoryParams {
    pub exclude_id: Option<i64>,
    pub limit: Option<i64>,
}

/// Parámetros del resumen de ventas
#[derive(Debug, Clone, Deserialize)]
pub struct SalesSummaryParams {
    pub zone: Option<String>,
    pub sold_by: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SalesSummaryParams {
    pub fn filter_set(&self) -> FilterSet {
        FilterSet {
            zone: self.zone.clone(),
            sold_by: self.sold_by.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
            ..FilterSet::default()
        }
        .normalized()
    }
}

/// Opciones distintas disponibles para cada filtro categórico
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub zones: Vec<String>,
    pub capacity_kw: Vec<String>,
    pub heaters: Vec<String>,
    pub controllers: Vec<String>,
    pub cards: Vec<String>,
    pub bodies: Vec<String>,
    pub sold_by: Vec<String>,
    pub lead_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_clamps_size() {
        let params = PaginationParams { page: 0, page_size: 500 };
        let window = params.page_window();
        assert_eq!(window.page, 1);
        assert_eq!(window.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_filter_set_drops_blank_strings() {
        let params = RecordListParams {
            search: Some(String::new()),
            zone: Some("Delhi".to_string()),
            capacity_kw: None,
            heater: None,
            controller: None,
            card: None,
            body: None,
            sold_by: None,
            lead_source: None,
            date_from: None,
            date_to: None,
            page: 1,
            page_size: 50,
            sort_by: default_sort_by(),
            sort_desc: true,
        };
        let filters = params.filter_set();
        assert_eq!(filters.search, None);
        assert_eq!(filters.zone.as_deref(), Some("Delhi"));
    }
}
