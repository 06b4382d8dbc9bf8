//! Estado de garantía derivado
//!
//! El estado de garantía nunca se persiste: se recalcula en cada lectura
//! a partir de la fecha de entrega y el reloj actual.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Estado de la garantía de un registro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    InWarranty,
    ExpiringSoon,
    OutOfWarranty,
}

impl WarrantyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarrantyStatus::InWarranty => "in_warranty",
            WarrantyStatus::ExpiringSoon => "expiring_soon",
            WarrantyStatus::OutOfWarranty => "out_of_warranty",
        }
    }
}

/// Resultado del cálculo de garantía
///
/// `days_remaining` es la diferencia con signo entre la fecha de expiración
/// y hoy: negativa cuando la garantía ya venció.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyInfo {
    pub status: WarrantyStatus,
    pub expiry_date: Option<NaiveDate>,
    pub days_remaining: i64,
}

impl WarrantyInfo {
    /// Días a mostrar: para garantías vencidas se reporta el valor
    /// absoluto (días desde el vencimiento).
    pub fn reported_days(&self) -> i64 {
        self.days_remaining.abs()
    }
}
