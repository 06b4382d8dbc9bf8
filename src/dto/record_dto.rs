//! DTOs de registros
//!
//! Requests de alta/edición y responses de la API. El precio de venta viaja
//! como `f64` en las responses; en base de datos es `NUMERIC(10,2)`.

use chrono::{DateTime, NaiveDate, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::record::Record;
use crate::models::warranty::{WarrantyInfo, WarrantyStatus};

/// Request para crear un registro
///
/// Solo `client_name` y `date_of_delivery` son obligatorios; el código de
/// registro se genera automáticamente si no viene informado.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecordRequest {
    #[validate(custom = "crate::utils::validation::validate_record_code")]
    pub record_code: Option<String>,

    pub date_of_delivery: NaiveDate,
    pub date_of_installation: Option<NaiveDate>,
    pub date_of_site_visit: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub site_visit_done_by: Option<String>,
    #[validate(length(max = 200))]
    pub installation_done_by: Option<String>,
    #[validate(length(max = 200))]
    pub commission_done_by: Option<String>,

    #[validate(length(max = 10))]
    pub capacity_kw: Option<String>,
    #[validate(length(max = 50))]
    pub heater: Option<String>,
    #[validate(length(max = 50))]
    pub controller: Option<String>,
    #[validate(length(max = 50))]
    pub card: Option<String>,
    #[validate(length(max = 50))]
    pub body: Option<String>,

    #[validate(length(min = 1, max = 200, message = "El nombre del cliente es requerido"))]
    pub client_name: String,
    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    #[validate(length(max = 100))]
    pub zone: Option<String>,

    #[validate(range(min = 0.0))]
    pub sale_price: Option<f64>,
    #[validate(length(max = 200))]
    pub sold_by: Option<String>,
    #[validate(length(max = 200))]
    pub lead_source: Option<String>,

    pub remarks: Option<String>,
}

/// Request para actualizar un registro (parcial)
///
/// Los campos ausentes conservan su valor actual.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRecordRequest {
    #[validate(custom = "crate::utils::validation::validate_record_code")]
    pub record_code: Option<String>,

    pub date_of_delivery: Option<NaiveDate>,
    pub date_of_installation: Option<NaiveDate>,
    pub date_of_site_visit: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub site_visit_done_by: Option<String>,
    #[validate(length(max = 200))]
    pub installation_done_by: Option<String>,
    #[validate(length(max = 200))]
    pub commission_done_by: Option<String>,

    #[validate(length(max = 10))]
    pub capacity_kw: Option<String>,
    #[validate(length(max = 50))]
    pub heater: Option<String>,
    #[validate(length(max = 50))]
    pub controller: Option<String>,
    #[validate(length(max = 50))]
    pub card: Option<String>,
    #[validate(length(max = 50))]
    pub body: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub client_name: Option<String>,
    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    #[validate(length(max = 100))]
    pub zone: Option<String>,

    #[validate(range(min = 0.0))]
    pub sale_price: Option<f64>,
    #[validate(length(max = 200))]
    pub sold_by: Option<String>,
    #[validate(length(max = 200))]
    pub lead_source: Option<String>,

    pub remarks: Option<String>,
}

/// Response de registro para la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: i64,
    pub record_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub date_of_delivery: NaiveDate,
    pub date_of_installation: Option<NaiveDate>,
    pub date_of_site_visit: Option<DateTime<Utc>>,
    pub site_visit_done_by: Option<String>,
    pub installation_done_by: Option<String>,
    pub commission_done_by: Option<String>,

    pub capacity_kw: Option<String>,
    pub heater: Option<String>,
    pub controller: Option<String>,
    pub card: Option<String>,
    pub body: Option<String>,

    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub zone: Option<String>,

    pub sale_price: Option<f64>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,

    pub remarks: Option<String>,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            record_code: record.record_code,
            created_at: record.created_at,
            updated_at: record.updated_at,
            date_of_delivery: record.date_of_delivery,
            date_of_installation: record.date_of_installation,
            date_of_site_visit: record.date_of_site_visit,
            site_visit_done_by: record.site_visit_done_by,
            installation_done_by: record.installation_done_by,
            commission_done_by: record.commission_done_by,
            capacity_kw: record.capacity_kw,
            heater: record.heater,
            controller: record.controller,
            card: record.card,
            body: record.body,
            client_name: record.client_name,
            client_phone: record.client_phone,
            client_address: record.client_address,
            zone: record.zone,
            sale_price: record.sale_price.and_then(|p| p.to_f64()),
            sold_by: record.sold_by,
            lead_source: record.lead_source,
            remarks: record.remarks,
        }
    }
}

/// Response de registro con su garantía derivada
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWithWarranty {
    #[serde(flatten)]
    pub record: RecordResponse,
    pub warranty_expiry: Option<NaiveDate>,
    pub warranty_status: WarrantyStatus,
    pub warranty_days: i64,
}

impl RecordWithWarranty {
    pub fn new(record: RecordResponse, warranty: WarrantyInfo) -> Self {
        Self {
            record,
            warranty_expiry: warranty.expiry_date,
            warranty_status: warranty.status,
            warranty_days: warranty.reported_days(),
        }
    }
}

/// Response de listados paginados de registros
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}
