//! Repositorio de registros
//!
//! Acceso a la tabla `records`: CRUD, búsqueda con filtros dinámicos,
//! ventanas de garantía calculadas en SQL y opciones de filtros.
//!
//! Las ventanas de garantía usan `date_of_delivery + INTERVAL '1 year'`,
//! que ajusta el 29 de febrero igual que el cálculo en memoria.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::record_dto::{CreateRecordRequest, UpdateRecordRequest};
use crate::models::filters::{FilterSet, PageWindow};
use crate::models::record::Record;
use crate::utils::errors::AppError;

/// Prefijo del código legible de registro (`RMZ-000001`)
const RECORD_CODE_PREFIX: &str = "RMZ-";

/// Columnas por las que se permite ordenar un listado
fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "record_code" => "record_code",
        "created_at" => "created_at",
        "updated_at" => "updated_at",
        "date_of_installation" => "date_of_installation",
        "client_name" => "client_name",
        "zone" => "zone",
        "sale_price" => "sale_price",
        "sold_by" => "sold_by",
        _ => "date_of_delivery",
    }
}

/// Añadir las condiciones WHERE de un `FilterSet` ya normalizado
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &FilterSet) {
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (record_code ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR client_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR client_phone ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR client_address ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(zone) = &filters.zone {
        qb.push(" AND zone = ");
        qb.push_bind(zone.clone());
    }
    if let Some(capacity_kw) = &filters.capacity_kw {
        qb.push(" AND capacity_kw = ");
        qb.push_bind(capacity_kw.clone());
    }
    if let Some(heater) = &filters.heater {
        qb.push(" AND heater = ");
        qb.push_bind(heater.clone());
    }
    if let Some(controller) = &filters.controller {
        qb.push(" AND controller = ");
        qb.push_bind(controller.clone());
    }
    if let Some(card) = &filters.card {
        qb.push(" AND card = ");
        qb.push_bind(card.clone());
    }
    if let Some(body) = &filters.body {
        qb.push(" AND body = ");
        qb.push_bind(body.clone());
    }
    if let Some(sold_by) = &filters.sold_by {
        qb.push(" AND sold_by = ");
        qb.push_bind(sold_by.clone());
    }
    if let Some(lead_source) = &filters.lead_source {
        qb.push(" AND lead_source = ");
        qb.push_bind(lead_source.clone());
    }

    if let Some(date_from) = filters.date_from {
        qb.push(" AND date_of_delivery >= ");
        qb.push_bind(date_from);
    }
    if let Some(date_to) = filters.date_to {
        qb.push(" AND date_of_delivery <= ");
        qb.push_bind(date_to);
    }
}

fn price_to_decimal(price: Option<f64>) -> Result<Option<Decimal>, AppError> {
    price
        .map(|p| {
            Decimal::from_f64_retain(p).ok_or_else(|| {
                AppError::BadRequest("El precio de venta no es un número válido".to_string())
            })
        })
        .transpose()
}

pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Generar el siguiente código legible de registro
    pub async fn next_record_code(&self) -> Result<String, AppError> {
        let last: Option<String> = sqlx::query_scalar(
            "SELECT record_code FROM records ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let next_num = last
            .and_then(|code| {
                code.strip_prefix(RECORD_CODE_PREFIX)
                    .and_then(|n| n.parse::<u64>().ok())
            })
            .map(|n| n + 1)
            .unwrap_or(1);

        Ok(format!("{}{:06}", RECORD_CODE_PREFIX, next_num))
    }

    pub async fn record_code_exists(&self, record_code: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM records WHERE record_code = $1)",
        )
        .bind(record_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(
        &self,
        record_code: String,
        request: &CreateRecordRequest,
    ) -> Result<Record, AppError> {
        let sale_price = price_to_decimal(request.sale_price)?;
        let now = Utc::now();

        let record = sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO records (
                record_code, created_at, updated_at,
                date_of_delivery, date_of_installation, date_of_site_visit,
                site_visit_done_by, installation_done_by, commission_done_by,
                capacity_kw, heater, controller, card, body,
                client_name, client_phone, client_address, zone,
                sale_price, sold_by, lead_source, remarks
            )
            VALUES ($1, $2, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(record_code)
        .bind(now)
        .bind(request.date_of_delivery)
        .bind(request.date_of_installation)
        .bind(request.date_of_site_visit)
        .bind(request.site_visit_done_by.clone())
        .bind(request.installation_done_by.clone())
        .bind(request.commission_done_by.clone())
        .bind(request.capacity_kw.clone())
        .bind(request.heater.clone())
        .bind(request.controller.clone())
        .bind(request.card.clone())
        .bind(request.body.clone())
        .bind(request.client_name.clone())
        .bind(request.client_phone.clone())
        .bind(request.client_address.clone())
        .bind(request.zone.clone())
        .bind(sale_price)
        .bind(request.sold_by.clone())
        .bind(request.lead_source.clone())
        .bind(request.remarks.clone())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Record>, AppError> {
        let record = sqlx::query_as::<_, Record>("SELECT * FROM records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn update(
        &self,
        id: i64,
        request: &UpdateRecordRequest,
    ) -> Result<Option<Record>, AppError> {
        // Obtener el registro actual y fusionar campo a campo
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let sale_price = match request.sale_price {
            Some(p) => price_to_decimal(Some(p))?,
            None => current.sale_price,
        };

        let record = sqlx::query_as::<_, Record>(
            r#"
            UPDATE records
            SET record_code = $2, updated_at = $3,
                date_of_delivery = $4, date_of_installation = $5, date_of_site_visit = $6,
                site_visit_done_by = $7, installation_done_by = $8, commission_done_by = $9,
                capacity_kw = $10, heater = $11, controller = $12, card = $13, body = $14,
                client_name = $15, client_phone = $16, client_address = $17, zone = $18,
                sale_price = $19, sold_by = $20, lead_source = $21, remarks = $22
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.record_code.clone().unwrap_or(current.record_code))
        .bind(Utc::now())
        .bind(request.date_of_delivery.unwrap_or(current.date_of_delivery))
        .bind(request.date_of_installation.or(current.date_of_installation))
        .bind(request.date_of_site_visit.or(current.date_of_site_visit))
        .bind(request.site_visit_done_by.clone().or(current.site_visit_done_by))
        .bind(request.installation_done_by.clone().or(current.installation_done_by))
        .bind(request.commission_done_by.clone().or(current.commission_done_by))
        .bind(request.capacity_kw.clone().or(current.capacity_kw))
        .bind(request.heater.clone().or(current.heater))
        .bind(request.controller.clone().or(current.controller))
        .bind(request.card.clone().or(current.card))
        .bind(request.body.clone().or(current.body))
        .bind(request.client_name.clone().unwrap_or(current.client_name))
        .bind(request.client_phone.clone().or(current.client_phone))
        .bind(request.client_address.clone().or(current.client_address))
        .bind(request.zone.clone().or(current.zone))
        .bind(sale_price)
        .bind(request.sold_by.clone().or(current.sold_by))
        .bind(request.lead_source.clone().or(current.lead_source))
        .bind(request.remarks.clone().or(current.remarks))
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(record))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Búsqueda con filtros, paginación y orden
    pub async fn search(
        &self,
        filters: &FilterSet,
        window: &PageWindow,
        sort_by: &str,
        sort_desc: bool,
    ) -> Result<(Vec<Record>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM records WHERE 1=1");
        push_filters(&mut count_qb, filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::new("SELECT * FROM records WHERE 1=1");
        push_filters(&mut qb, filters);
        qb.push(" ORDER BY ");
        qb.push(sort_column(sort_by));
        qb.push(if sort_desc { " DESC" } else { " ASC" });
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(window.page_size));
        qb.push(" OFFSET ");
        qb.push_bind(window.offset());

        let records = qb
            .build_query_as::<Record>()
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total))
    }

    /// Todos los registros que cumplen los filtros, sin paginar (resúmenes)
    pub async fn find_all_filtered(&self, filters: &FilterSet) -> Result<Vec<Record>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM records WHERE 1=1");
        push_filters(&mut qb, filters);
        qb.push(" ORDER BY date_of_delivery DESC");

        let records = qb
            .build_query_as::<Record>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Historial de un cliente por teléfono exacto, más reciente primero
    pub async fn find_by_client_phone(
        &self,
        client_phone: &str,
        exclude_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Record>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM records WHERE client_phone = ");
        qb.push_bind(client_phone.to_string());
        if let Some(exclude) = exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(exclude);
        }
        qb.push(" ORDER BY date_of_delivery DESC LIMIT ");
        qb.push_bind(limit);

        let records = qb
            .build_query_as::<Record>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Registros con la garantía ya vencida
    pub async fn find_out_of_warranty(
        &self,
        window: &PageWindow,
    ) -> Result<(Vec<Record>, i64), AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM records WHERE date_of_delivery + INTERVAL '1 year' < CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;

        let records = sqlx::query_as::<_, Record>(
            r#"
            SELECT * FROM records
            WHERE date_of_delivery + INTERVAL '1 year' < CURRENT_DATE
            ORDER BY date_of_delivery DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(window.page_size))
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((records, total))
    }

    /// Registros cuya garantía vence dentro de `days` días (incluye hoy)
    pub async fn find_expiring_soon(
        &self,
        days: u32,
        window: &PageWindow,
    ) -> Result<(Vec<Record>, i64), AppError> {
        let days = i32::try_from(days).unwrap_or(i32::MAX);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM records
            WHERE date_of_delivery + INTERVAL '1 year' >= CURRENT_DATE
              AND date_of_delivery + INTERVAL '1 year' <= CURRENT_DATE + make_interval(days => $1)
            "#,
        )
        .bind(days)
        .fetch_one(&self.pool)
        .await?;

        let records = sqlx::query_as::<_, Record>(
            r#"
            SELECT * FROM records
            WHERE date_of_delivery + INTERVAL '1 year' >= CURRENT_DATE
              AND date_of_delivery + INTERVAL '1 year' <= CURRENT_DATE + make_interval(days => $1)
            ORDER BY date_of_delivery ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(days)
        .bind(i64::from(window.page_size))
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((records, total))
    }

    /// Fechas de entrega de todos los registros (resumen de garantías)
    pub async fn delivery_dates(&self) -> Result<Vec<NaiveDate>, AppError> {
        let dates: Vec<NaiveDate> =
            sqlx::query_scalar("SELECT date_of_delivery FROM records")
                .fetch_all(&self.pool)
                .await?;

        Ok(dates)
    }

    /// Valores distintos de cada campo categórico, ordenados
    pub async fn distinct_values(&self, column: FilterColumn) -> Result<Vec<String>, AppError> {
        let sql = match column {
            FilterColumn::Zone => {
                "SELECT DISTINCT zone FROM records WHERE zone IS NOT NULL ORDER BY zone"
            }
            FilterColumn::CapacityKw => {
                "SELECT DISTINCT capacity_kw FROM records WHERE capacity_kw IS NOT NULL ORDER BY capacity_kw"
            }
            FilterColumn::Heater => {
                "SELECT DISTINCT heater FROM records WHERE heater IS NOT NULL ORDER BY heater"
            }
            FilterColumn::Controller => {
                "SELECT DISTINCT controller FROM records WHERE controller IS NOT NULL ORDER BY controller"
            }
            FilterColumn::Card => {
                "SELECT DISTINCT card FROM records WHERE card IS NOT NULL ORDER BY card"
            }
            FilterColumn::Body => {
                "SELECT DISTINCT body FROM records WHERE body IS NOT NULL ORDER BY body"
            }
            FilterColumn::SoldBy => {
                "SELECT DISTINCT sold_by FROM records WHERE sold_by IS NOT NULL ORDER BY sold_by"
            }
            FilterColumn::LeadSource => {
                "SELECT DISTINCT lead_source FROM records WHERE lead_source IS NOT NULL ORDER BY lead_source"
            }
        };

        let values: Vec<String> = sqlx::query_scalar(sql).fetch_all(&self.pool).await?;
        Ok(values)
    }
}

/// Campos categóricos con desplegable de opciones
#[derive(Debug, Clone, Copy)]
pub enum FilterColumn {
    Zone,
    CapacityKw,
    Heater,
    Controller,
    Card,
    Body,
    SoldBy,
    LeadSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("client_name"), "client_name");
        assert_eq!(sort_column("sale_price"), "sale_price");
        // columnas desconocidas caen al orden por defecto
        assert_eq!(sort_column("robert'); DROP TABLE records;--"), "date_of_delivery");
        assert_eq!(sort_column(""), "date_of_delivery");
    }

    #[test]
    fn test_price_to_decimal() {
        assert_eq!(price_to_decimal(None).unwrap(), None);
        let value = price_to_decimal(Some(45000.50)).unwrap().unwrap();
        assert_eq!(value.to_string(), "45000.5");
        assert!(price_to_decimal(Some(f64::NAN)).is_err());
    }
}
