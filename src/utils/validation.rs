//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    // Dígitos con separadores comunes, opcionalmente con prefijo internacional
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("regex de teléfono inválida");
    static ref RECORD_CODE_RE: Regex = Regex::new(r"^RMZ-\d{6}$").expect("regex de código de registro inválida");
}

/// Validar formato de teléfono de cliente
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar formato del código de registro (`RMZ-000001`)
pub fn validate_record_code(value: &str) -> Result<(), ValidationError> {
    if RECORD_CODE_RE.is_match(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("record_code");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"RMZ-000000".to_string());
    Err(error)
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
