//! Modelo de Record
//!
//! Este módulo contiene el struct Record que mapea exactamente
//! a la tabla `records`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registro de instalación/mantenimiento de un equipo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Record {
    pub id: i64,

    // Identificación
    pub record_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Fechas y trabajos
    pub date_of_delivery: NaiveDate,
    pub date_of_installation: Option<NaiveDate>,
    pub date_of_site_visit: Option<DateTime<Utc>>,
    pub site_visit_done_by: Option<String>,
    pub installation_done_by: Option<String>,
    pub commission_done_by: Option<String>,

    // Equipo
    pub capacity_kw: Option<String>,
    pub heater: Option<String>,
    pub controller: Option<String>,
    pub card: Option<String>,
    pub body: Option<String>,

    // Cliente
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub zone: Option<String>,

    // Comercial
    pub sale_price: Option<Decimal>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,

    // Otros
    pub remarks: Option<String>,
}
