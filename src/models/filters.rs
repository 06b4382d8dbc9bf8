//! Conjunto de filtros y ventana de paginación
//!
//! Un mismo `FilterSet` alimenta el listado de mantenimiento, el listado de
//! ventas y las exportaciones. Cada campo es opcional: la ausencia significa
//! "sin restricción" y un string vacío nunca viaja como filtro literal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Vista que consume el conjunto de filtros
///
/// El rango de fechas solo lo soportan las vistas que lo declaran; el
/// listado de registros de mantenimiento lo descarta silenciosamente
/// aunque esté presente en el `FilterSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    MaintenanceRecords,
    SalesRecords,
    Export,
}

impl ListingScope {
    pub fn supports_date_range(&self) -> bool {
        matches!(self, ListingScope::SalesRecords | ListingScope::Export)
    }
}

/// Filtros dispersos compartidos por listados y exportaciones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
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
}

// Un input limpiado llega como string vacío: se normaliza a ausencia
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl FilterSet {
    /// Normalizar el conjunto: strings vacíos o de solo espacios pasan a `None`
    pub fn normalized(self) -> FilterSet {
        FilterSet {
            search: none_if_blank(self.search),
            zone: none_if_blank(self.zone),
            capacity_kw: none_if_blank(self.capacity_kw),
            heater: none_if_blank(self.heater),
            controller: none_if_blank(self.controller),
            card: none_if_blank(self.card),
            body: none_if_blank(self.body),
            sold_by: none_if_blank(self.sold_by),
            lead_source: none_if_blank(self.lead_source),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSet::default()
    }

    /// Representación canónica como pares `(campo, valor)`
    ///
    /// Los campos ausentes se omiten por completo (nunca `campo=`), el orden
    /// es alfabético para que sea reproducible, y el rango de fechas solo se
    /// emite en las vistas que lo declaran.
    pub fn to_query_pairs(
        &self,
        window: Option<&PageWindow>,
        scope: ListingScope,
    ) -> Vec<(&'static str, String)> {
        let normalized = self.clone().normalized();
        let mut pairs: Vec<(&'static str, String)> = Vec::new();

        let mut push_str = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value {
                pairs.push((key, v.clone()));
            }
        };

        push_str("search", &normalized.search);
        push_str("zone", &normalized.zone);
        push_str("capacity_kw", &normalized.capacity_kw);
        push_str("heater", &normalized.heater);
        push_str("controller", &normalized.controller);
        push_str("card", &normalized.card);
        push_str("body", &normalized.body);
        push_str("sold_by", &normalized.sold_by);
        push_str("lead_source", &normalized.lead_source);

        if scope.supports_date_range() {
            if let Some(from) = normalized.date_from {
                pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
            }
            if let Some(to) = normalized.date_to {
                pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
            }
        }

        if let Some(window) = window {
            pairs.push(("page", window.page.to_string()));
            pairs.push(("page_size", window.page_size.to_string()));
        }

        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Query string codificada lista para la URL
    pub fn to_query_string(&self, window: Option<&PageWindow>, scope: ListingScope) -> String {
        self.to_query_pairs(window, scope)
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Reconstruir un `FilterSet` desde pares de query
    ///
    /// Inversa de `to_query_pairs` módulo orden de claves; los parámetros de
    /// paginación se ignoran.
    pub fn from_query_pairs<'a, I>(pairs: I) -> FilterSet
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = FilterSet::default();
        for (key, value) in pairs {
            match key {
                "search" => filters.search = Some(value.to_string()),
                "zone" => filters.zone = Some(value.to_string()),
                "capacity_kw" => filters.capacity_kw = Some(value.to_string()),
                "heater" => filters.heater = Some(value.to_string()),
                "controller" => filters.controller = Some(value.to_string()),
                "card" => filters.card = Some(value.to_string()),
                "body" => filters.body = Some(value.to_string()),
                "sold_by" => filters.sold_by = Some(value.to_string()),
                "lead_source" => filters.lead_source = Some(value.to_string()),
                "date_from" => {
                    filters.date_from = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
                }
                "date_to" => filters.date_to = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
                // page / page_size y claves desconocidas no forman parte del filtro
                _ => {}
            }
        }
        filters.normalized()
    }
}

/// Ventana de paginación de un listado
///
/// Efímera: vive dentro de una vista y vuelve a la página 1 cada vez que
/// cambia el conjunto de filtros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size: page_size.max(1) }
    }

    /// Volver a la primera página (al cambiar filtros)
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// Total de páginas para un total de filas dado (mínimo 1)
    pub fn total_pages(&self, total: i64) -> u32 {
        if total <= 0 {
            return 1;
        }
        let size = i64::from(self.page_size);
        let pages = (total + size - 1) / size;
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Ajustar la página al rango `[1, total_pages]`
    ///
    /// Devuelve `true` si la página cambió (p. ej. el total se redujo tras
    /// un borrado y la página actual quedó fuera de rango).
    pub fn clamp_to_total(&mut self, total: i64) -> bool {
        let max = self.total_pages(total);
        let clamped = self.page.clamp(1, max);
        if clamped != self.page {
            self.page = clamped;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let filters = FilterSet {
            search: Some("".to_string()),
            zone: Some("  ".to_string()),
            heater: Some("Ceramic".to_string()),
            ..FilterSet::default()
        };
        let pairs = filters.to_query_pairs(None, ListingScope::MaintenanceRecords);
        assert_eq!(pairs, vec![("heater", "Ceramic".to_string())]);
    }

    #[test]
    fn test_pairs_are_alphabetical_and_deterministic() {
        let filters = FilterSet {
            zone: Some("Delhi".to_string()),
            search: Some("R-001".to_string()),
            body: Some("Steel".to_string()),
            ..FilterSet::default()
        };
        let window = PageWindow { page: 2, page_size: 12 };
        let pairs = filters.to_query_pairs(Some(&window), ListingScope::MaintenanceRecords);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["body", "page", "page_size", "search", "zone"]);

        // Normalizar dos veces produce exactamente la misma salida
        let again = filters.to_query_pairs(Some(&window), ListingScope::MaintenanceRecords);
        assert_eq!(pairs, again);
    }

    #[test]
    fn test_date_range_only_for_supporting_scopes() {
        let filters = FilterSet {
            zone: Some("Delhi".to_string()),
            date_from: Some(date(2024, 1, 1)),
            date_to: Some(date(2024, 6, 30)),
            ..FilterSet::default()
        };

        let maintenance = filters.to_query_pairs(None, ListingScope::MaintenanceRecords);
        assert!(maintenance.iter().all(|(k, _)| *k != "date_from" && *k != "date_to"));

        let sales = filters.to_query_pairs(None, ListingScope::SalesRecords);
        assert!(sales.iter().any(|(k, _)| *k == "date_from"));
        assert!(sales.iter().any(|(k, _)| *k == "date_to"));

        let export = filters.to_query_pairs(None, ListingScope::Export);
        assert!(export.iter().any(|(k, _)| *k == "date_from"));
    }

    #[test]
    fn test_round_trip_reconstructs_equivalent_set() {
        let filters = FilterSet {
            search: Some("R-00".to_string()),
            zone: Some("Delhi".to_string()),
            capacity_kw: Some("7.5".to_string()),
            sold_by: Some("Meera".to_string()),
            date_from: Some(date(2024, 3, 1)),
            ..FilterSet::default()
        };
        let pairs = filters.to_query_pairs(Some(&PageWindow::new(12)), ListingScope::SalesRecords);
        let parsed = FilterSet::from_query_pairs(
            pairs.iter().map(|(k, v)| (*k, v.as_str())),
        );
        assert_eq!(parsed, filters.clone().normalized());
    }

    #[test]
    fn test_query_string_is_url_encoded() {
        let filters = FilterSet {
            search: Some("Núñez & Hijos".to_string()),
            ..FilterSet::default()
        };
        let qs = filters.to_query_string(None, ListingScope::MaintenanceRecords);
        assert_eq!(qs, "search=N%C3%BA%C3%B1ez%20%26%20Hijos");
    }

    #[test]
    fn test_total_pages_and_clamp() {
        let mut window = PageWindow { page: 1, page_size: 12 };
        assert_eq!(window.total_pages(25), 3);
        assert_eq!(window.total_pages(24), 2);
        assert_eq!(window.total_pages(0), 1);

        // total=25 -> 3 páginas; borrar un registro deja 24 -> siguen 2+
        window.page = 2;
        assert!(!window.clamp_to_total(24));
        assert_eq!(window.page, 2);

        // el total cae a 11 estando en la página 2: la página se ajusta a 1
        assert!(window.clamp_to_total(11));
        assert_eq!(window.page, 1);
    }

    #[test]
    fn test_offset() {
        let window = PageWindow { page: 3, page_size: 12 };
        assert_eq!(window.offset(), 24);
    }
}
