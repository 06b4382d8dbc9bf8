//! Servicio de cálculo de garantía
//!
//! La garantía dura exactamente un año calendario desde la fecha de entrega.
//! El estado es derivado: se calcula como función pura de
//! `(fecha de entrega, hoy, umbral)` y nunca se cachea, porque "hoy" cambia
//! entre peticiones sin que haya escritura alguna.

use chrono::{Months, NaiveDate};

use crate::config::environment::DEFAULT_EXPIRING_SOON_DAYS;
use crate::dto::warranty_dto::WarrantySummary;
use crate::models::warranty::{WarrantyInfo, WarrantyStatus};

/// Rango permitido para el umbral de "por vencer"
pub const MIN_EXPIRING_SOON_DAYS: u32 = 1;
pub const MAX_EXPIRING_SOON_DAYS: u32 = 365;

/// Ajustar el umbral al rango permitido; `None` usa el valor por defecto
pub fn clamp_expiring_soon_days(days: Option<u32>) -> u32 {
    days.unwrap_or(DEFAULT_EXPIRING_SOON_DAYS)
        .clamp(MIN_EXPIRING_SOON_DAYS, MAX_EXPIRING_SOON_DAYS)
}

/// Fecha de expiración: entrega más un año calendario
///
/// Para el 29 de febrero chrono ajusta al último día del mes resultante
/// (29-feb-2024 + 12 meses = 28-feb-2025), el mismo convenio que aplica
/// `date + INTERVAL '1 year'` en PostgreSQL.
pub fn warranty_expiry(date_of_delivery: NaiveDate) -> NaiveDate {
    date_of_delivery + Months::new(12)
}

/// Calcular estado de garantía a una fecha dada
///
/// Política de borde: `days_remaining == 0` (vence hoy) cuenta como
/// `expiring_soon`; solo los días negativos son `out_of_warranty`.
///
/// Una entrega ausente degrada a `out_of_warranty` con cero días en lugar
/// de fallar; la fecha de entrega es obligatoria en el alta, así que este
/// camino solo cubre datos históricos incompletos.
pub fn warranty_info(
    date_of_delivery: Option<NaiveDate>,
    today: NaiveDate,
    expiring_soon_days: u32,
) -> WarrantyInfo {
    let Some(delivery) = date_of_delivery else {
        return WarrantyInfo {
            status: WarrantyStatus::OutOfWarranty,
            expiry_date: None,
            days_remaining: 0,
        };
    };

    let expiry = warranty_expiry(delivery);
    let days_remaining = (expiry - today).num_days();

    let status = if days_remaining < 0 {
        WarrantyStatus::OutOfWarranty
    } else if days_remaining <= i64::from(expiring_soon_days) {
        WarrantyStatus::ExpiringSoon
    } else {
        WarrantyStatus::InWarranty
    };

    WarrantyInfo {
        status,
        expiry_date: Some(expiry),
        days_remaining,
    }
}

/// Resumen de garantías sobre un conjunto de fechas de entrega
pub fn summarize(
    delivery_dates: &[NaiveDate],
    today: NaiveDate,
    expiring_soon_days: u32,
) -> WarrantySummary {
    let mut summary = WarrantySummary {
        in_warranty: 0,
        out_of_warranty: 0,
        expiring_soon: 0,
        total: delivery_dates.len() as i64,
    };

    for delivery in delivery_dates {
        match warranty_info(Some(*delivery), today, expiring_soon_days).status {
            WarrantyStatus::InWarranty => summary.in_warranty += 1,
            WarrantyStatus::ExpiringSoon => summary.expiring_soon += 1,
            WarrantyStatus::OutOfWarranty => summary.out_of_warranty += 1,
        }
    }

    summary
}
