//! Servicio de exportación
//!
//! Genera los ficheros de exportación de registros: CSV con comillas según
//! RFC 4180 y XLSX mediante `rust_xlsxwriter`. Las exportaciones aplican los
//! mismos filtros que los listados y nunca paginan.

use num_traits::ToPrimitive;
use rust_xlsxwriter::Workbook;

use crate::models::record::Record;
use crate::utils::errors::AppError;

/// Cabeceras de las exportaciones, en el orden de las columnas
const EXPORT_HEADERS: [&str; 23] = [
    "ID",
    "Record Code",
    "Created At",
    "Updated At",
    "Date of Delivery",
    "Date of Installation",
    "Date of Site Visit",
    "Site Visit Done By",
    "Installation Done By",
    "Commission Done By",
    "Capacity (KW)",
    "Heater",
    "Controller",
    "Card",
    "Body",
    "Client Name",
    "Client Phone",
    "Client Address",
    "Zone",
    "Sale Price",
    "Sold By",
    "Lead Source",
    "Remarks",
];

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Valores de un registro en el orden de `EXPORT_HEADERS`
fn record_row(record: &Record) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.record_code.clone(),
        record.created_at.to_rfc3339(),
        record.updated_at.to_rfc3339(),
        record.date_of_delivery.format("%Y-%m-%d").to_string(),
        record
            .date_of_installation
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        record
            .date_of_site_visit
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
        opt(&record.site_visit_done_by),
        opt(&record.installation_done_by),
        opt(&record.commission_done_by),
        opt(&record.capacity_kw),
        opt(&record.heater),
        opt(&record.controller),
        opt(&record.card),
        opt(&record.body),
        record.client_name.clone(),
        opt(&record.client_phone),
        opt(&record.client_address),
        opt(&record.zone),
        record
            .sale_price
            .map(|p| p.to_string())
            .unwrap_or_default(),
        opt(&record.sold_by),
        opt(&record.lead_source),
        opt(&record.remarks),
    ]
}

/// Escapar un campo CSV (RFC 4180)
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Exportar registros a CSV
pub fn records_to_csv(records: &[Record]) -> String {
    let mut out = String::new();

    out.push_str(
        &EXPORT_HEADERS
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push_str("\r\n");

    for record in records {
        let row = record_row(record)
            .iter()
            .map(|f| csv_escape(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push_str("\r\n");
    }

    out
}

/// Exportar registros a XLSX
pub fn records_to_xlsx(records: &[Record]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name("Records")
        .map_err(|e| AppError::Export(format!("Failed to name worksheet: {}", e)))?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| AppError::Export(format!("Failed to write header '{}': {}", header, e)))?;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;
        let row = record_row(record);

        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            // el id y el precio se escriben como números para que Excel los trate como tales
            if col == 0 {
                worksheet
                    .write_number(r, col, record.id as f64)
                    .map_err(|e| AppError::Export(format!("Failed to write id: {}", e)))?;
            } else if col == 19 {
                if let Some(price) = record.sale_price.and_then(|p| p.to_f64()) {
                    worksheet
                        .write_number(r, col, price)
                        .map_err(|e| AppError::Export(format!("Failed to write price: {}", e)))?;
                }
            } else {
                worksheet
                    .write_string(r, col, value)
                    .map_err(|e| AppError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Export(format!("Failed to serialize workbook: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn sample_record() -> Record {
        let created = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        Record {
            id: 7,
            record_code: "RMZ-000007".to_string(),
            created_at: created,
            updated_at: created,
            date_of_delivery: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
            date_of_installation: None,
            date_of_site_visit: None,
            site_visit_done_by: None,
            installation_done_by: None,
            commission_done_by: None,
            capacity_kw: Some("7.5".to_string()),
            heater: None,
            controller: None,
            card: None,
            body: None,
            client_name: "Pérez, \"La Huerta\"".to_string(),
            client_phone: Some("600123456".to_string()),
            client_address: Some("Calle Mayor 1\nMadrid".to_string()),
            zone: Some("Centro".to_string()),
            sale_price: Some(Decimal::new(4500050, 2)),
            sold_by: None,
            lead_source: None,
            remarks: None,
        }
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("di\"jo"), "\"di\"\"jo\"");
        assert_eq!(csv_escape("dos\nlíneas"), "\"dos\nlíneas\"");
    }

    #[test]
    fn test_csv_structure() {
        let csv = records_to_csv(&[sample_record()]);
        let mut lines = csv.split("\r\n");

        let header = lines.next().unwrap();
        assert!(header.starts_with("ID,Record Code,"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("7,RMZ-000007,"));
        // nombre con coma y comillas queda entrecomillado y doblado
        assert!(row.contains("\"Pérez, \"\"La Huerta\"\"\""));
        assert!(row.contains("45000.50"));
    }

    #[test]
    fn test_csv_empty_set_has_only_header() {
        let csv = records_to_csv(&[]);
        assert_eq!(csv.split("\r\n").filter(|l| !l.is_empty()).count(), 1);
    }

    #[test]
    fn test_xlsx_generates_non_empty_buffer() {
        let bytes = records_to_xlsx(&[sample_record()]).unwrap();
        // un XLSX es un zip: firma PK
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[0..2], b"PK");
    }
}
