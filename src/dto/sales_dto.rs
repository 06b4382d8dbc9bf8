//! DTOs de analítica de ventas
//!
//! El resumen llega ya agregado desde el servidor; el cliente solo deriva
//! porcentajes de presentación.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ventas de un mes (clave `YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub count: i64,
    pub revenue: f64,
}

/// Proyección de ventas de un mes futuro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSale {
    pub month: String,
    pub count: i64,
    pub revenue: f64,
}

/// Detalle de valores de pedido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub total_orders: i64,
    pub orders_with_price: i64,
    pub orders_without_price: i64,
    pub average_order_value: Option<f64>,
    pub highest_order: f64,
    pub lowest_order: f64,
}

/// Resumen de ventas con totales, desgloses, tendencias y proyecciones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_records: i64,
    pub total_revenue: Option<f64>,
    pub average_order_value: Option<f64>,
    pub by_zone: BTreeMap<String, i64>,
    pub by_zone_revenue: BTreeMap<String, f64>,
    pub by_sold_by: BTreeMap<String, i64>,
    pub by_sold_by_revenue: BTreeMap<String, f64>,
    pub by_lead_source: BTreeMap<String, i64>,
    pub by_lead_source_revenue: BTreeMap<String, f64>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub projected_sales: Vec<ProjectedSale>,
    pub order_details: OrderDetails,
}

impl SalesSummary {
    /// Porcentaje de un conteo sobre el total de registros (presentación)
    pub fn percent_of_total(&self, count: i64) -> f64 {
        if self.total_records <= 0 {
            return 0.0;
        }
        (count as f64 / self.total_records as f64) * 100.0
    }
}
