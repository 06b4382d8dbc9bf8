//! Servicio de resumen de ventas
//!
//! Agrega totales, desgloses por zona/vendedor/origen, tendencia mensual de
//! los últimos doce meses y una proyección simple a tres meses basada en la
//! media reciente y la tasa de crecimiento.

use num_traits::ToPrimitive;
use std::collections::BTreeMap;

use crate::dto::sales_dto::{MonthlyTrend, OrderDetails, ProjectedSale, SalesSummary};
use crate::models::record::Record;

/// Meses de historia incluidos en la tendencia
const TREND_MONTHS: usize = 12;
/// Meses proyectados hacia adelante
const PROJECTION_MONTHS: u32 = 3;

fn record_price(record: &Record) -> Option<f64> {
    record.sale_price.and_then(|p| p.to_f64()).filter(|p| *p > 0.0)
}

fn bucket_label(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "Unknown".to_string())
}

/// Construir el resumen de ventas a partir de los registros ya filtrados
pub fn build_sales_summary(records: &[Record]) -> SalesSummary {
    let total_records = records.len() as i64;

    let prices: Vec<f64> = records.iter().filter_map(record_price).collect();
    let total_revenue: f64 = prices.iter().sum();
    let average_order_value = if prices.is_empty() {
        0.0
    } else {
        total_revenue / prices.len() as f64
    };

    // Desgloses por zona, vendedor y origen (conteo e ingresos)
    let mut by_zone: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_zone_revenue: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_sold_by: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_sold_by_revenue: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_lead_source: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_lead_source_revenue: BTreeMap<String, f64> = BTreeMap::new();

    for record in records {
        let price = record_price(record);

        let zone = bucket_label(&record.zone);
        *by_zone.entry(zone.clone()).or_insert(0) += 1;
        if let Some(p) = price {
            *by_zone_revenue.entry(zone).or_insert(0.0) += p;
        }

        let sold_by = bucket_label(&record.sold_by);
        *by_sold_by.entry(sold_by.clone()).or_insert(0) += 1;
        if let Some(p) = price {
            *by_sold_by_revenue.entry(sold_by).or_insert(0.0) += p;
        }

        let lead_source = bucket_label(&record.lead_source);
        *by_lead_source.entry(lead_source.clone()).or_insert(0) += 1;
        if let Some(p) = price {
            *by_lead_source_revenue.entry(lead_source).or_insert(0.0) += p;
        }
    }

    let monthly_trends = monthly_trends(records);
    let projected_sales = project_sales(&monthly_trends);

    let highest_order = prices.iter().cloned().fold(0.0_f64, f64::max);
    let lowest_order = prices
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);

    let order_details = OrderDetails {
        total_orders: total_records,
        orders_with_price: prices.len() as i64,
        orders_without_price: total_records - prices.len() as i64,
        average_order_value: (average_order_value > 0.0).then_some(average_order_value),
        highest_order,
        lowest_order: if prices.is_empty() { 0.0 } else { lowest_order },
    };

    SalesSummary {
        total_records,
        total_revenue: (total_revenue > 0.0).then_some(total_revenue),
        average_order_value: (average_order_value > 0.0).then_some(average_order_value),
        by_zone,
        by_zone_revenue,
        by_sold_by,
        by_sold_by_revenue,
        by_lead_source,
        by_lead_source_revenue,
        monthly_trends,
        projected_sales,
        order_details,
    }
}

/// Tendencia mensual de los últimos doce meses con actividad
fn monthly_trends(records: &[Record]) -> Vec<MonthlyTrend> {
    let mut monthly: BTreeMap<String, (i64, f64)> = BTreeMap::new();

    for record in records {
        let month_key = record.date_of_delivery.format("%Y-%m").to_string();
        let entry = monthly.entry(month_key).or_insert((0, 0.0));
        entry.0 += 1;
        if let Some(p) = record_price(record) {
            entry.1 += p;
        }
    }

    // BTreeMap ya ordena por mes; nos quedamos con los últimos doce
    let months: Vec<(String, (i64, f64))> = monthly.into_iter().collect();
    let start = months.len().saturating_sub(TREND_MONTHS);
    months[start..]
        .iter()
        .map(|(month, (count, revenue))| MonthlyTrend {
            month: month.clone(),
            count: *count,
            revenue: *revenue,
        })
        .collect()
}

fn next_month_key(month: &str) -> Option<String> {
    let (year, month_num) = month.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month_num: u32 = month_num.parse().ok()?;
    let (next_year, next_month) = if month_num == 12 {
        (year + 1, 1)
    } else {
        (year, month_num + 1)
    };
    Some(format!("{:04}-{:02}", next_year, next_month))
}

/// Proyección a tres meses basada en la media de los últimos tres
/// y la tasa de crecimiento frente a los tres anteriores
fn project_sales(trends: &[MonthlyTrend]) -> Vec<ProjectedSale> {
    if trends.len() < 3 {
        return Vec::new();
    }

    let recent = &trends[trends.len() - 3..];
    let avg_count: f64 = recent.iter().map(|m| m.count as f64).sum::<f64>() / 3.0;
    let avg_revenue: f64 = recent.iter().map(|m| m.revenue).sum::<f64>() / 3.0;

    let growth_rate = if trends.len() >= 6 {
        let older = &trends[trends.len() - 6..trends.len() - 3];
        let older_avg: f64 = older.iter().map(|m| m.count as f64).sum::<f64>() / 3.0;
        if older_avg > 0.0 {
            (avg_count - older_avg) / older_avg
        } else {
            0.0
        }
    } else {
        0.0
    };

    let mut projections = Vec::new();
    let mut month_key = match trends.last() {
        Some(last) => last.month.clone(),
        None => return Vec::new(),
    };

    for i in 1..=PROJECTION_MONTHS {
        let Some(next) = next_month_key(&month_key) else {
            break;
        };
        let factor = (1.0 + growth_rate).powi(i as i32);
        projections.push(ProjectedSale {
            month: next.clone(),
            count: (avg_count * factor) as i64,
            revenue: avg_revenue * factor,
        });
        month_key = next;
    }

    projections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn record(delivery: (i32, u32, u32), zone: Option<&str>, sold_by: Option<&str>, price: Option<i64>) -> Record {
        let now = Utc::now();
        Record {
            id: 1,
            record_code: "RMZ-000001".to_string(),
            created_at: now,
            updated_at: now,
            date_of_delivery: NaiveDate::from_ymd_opt(delivery.0, delivery.1, delivery.2).unwrap(),
            date_of_installation: None,
            date_of_site_visit: None,
            site_visit_done_by: None,
            installation_done_by: None,
            commission_done_by: None,
            capacity_kw: None,
            heater: None,
            controller: None,
            card: None,
            body: None,
            client_name: "Cliente".to_string(),
            client_phone: None,
            client_address: None,
            zone: zone.map(|z| z.to_string()),
            sale_price: price.map(Decimal::from),
            sold_by: sold_by.map(|s| s.to_string()),
            lead_source: None,
            remarks: None,
        }
    }

    #[test]
    fn test_totals_and_breakdowns() {
        let records = vec![
            record((2025, 1, 10), Some("Delhi"), Some("Meera"), Some(1000)),
            record((2025, 1, 20), Some("Delhi"), Some("Raj"), Some(2000)),
            record((2025, 2, 5), Some("Noida"), None, None),
        ];
        let summary = build_sales_summary(&records);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_revenue, Some(3000.0));
        assert_eq!(summary.average_order_value, Some(1500.0));
        assert_eq!(summary.by_zone.get("Delhi"), Some(&2));
        assert_eq!(summary.by_zone.get("Noida"), Some(&1));
        assert_eq!(summary.by_zone_revenue.get("Delhi"), Some(&3000.0));
        // sin vendedor informado cae en "Unknown"
        assert_eq!(summary.by_sold_by.get("Unknown"), Some(&1));
        assert_eq!(summary.order_details.orders_with_price, 2);
        assert_eq!(summary.order_details.orders_without_price, 1);
        assert_eq!(summary.order_details.highest_order, 2000.0);
        assert_eq!(summary.order_details.lowest_order, 1000.0);
    }

    #[test]
    fn test_empty_set() {
        let summary = build_sales_summary(&[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_revenue, None);
        assert_eq!(summary.average_order_value, None);
        assert!(summary.monthly_trends.is_empty());
        assert!(summary.projected_sales.is_empty());
        assert_eq!(summary.order_details.highest_order, 0.0);
        assert_eq!(summary.order_details.lowest_order, 0.0);
    }

    #[test]
    fn test_monthly_trends_sorted_and_capped() {
        let mut records = Vec::new();
        // 14 meses consecutivos, uno por mes
        for m in 0..14u32 {
            let year = 2024 + (m / 12) as i32;
            let month = (m % 12) + 1;
            records.push(record((year, month, 15), None, None, Some(100)));
        }
        let summary = build_sales_summary(&records);
        assert_eq!(summary.monthly_trends.len(), 12);
        assert_eq!(summary.monthly_trends.first().unwrap().month, "2024-03");
        assert_eq!(summary.monthly_trends.last().unwrap().month, "2025-02");
    }

    #[test]
    fn test_projection_follows_recent_average() {
        // seis meses planos: crecimiento cero, proyección igual a la media
        let mut records = Vec::new();
        for month in 1..=6u32 {
            records.push(record((2025, month, 10), None, None, Some(500)));
            records.push(record((2025, month, 20), None, None, Some(500)));
        }
        let summary = build_sales_summary(&records);
        assert_eq!(summary.projected_sales.len(), 3);
        let first = &summary.projected_sales[0];
        assert_eq!(first.month, "2025-07");
        assert_eq!(first.count, 2);
        assert!((first.revenue - 1000.0).abs() < 1e-9);
        assert_eq!(summary.projected_sales[2].month, "2025-09");
    }

    #[test]
    fn test_projection_rolls_over_year() {
        let mut records = Vec::new();
        for month in 7..=12u32 {
            records.push(record((2024, month, 10), None, None, Some(100)));
        }
        let summary = build_sales_summary(&records);
        let months: Vec<&str> = summary
            .projected_sales
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
    }
}
