//! Consumidor de listados paginados
//!
//! Cada vista de listado (registros de mantenimiento, registros de ventas,
//! sub-listados de garantía) es dueña de su propio consumidor: filtros,
//! ventana de página y datos cargados no se comparten entre vistas.
//!
//! El consumidor es una máquina de estados `idle → loading → loaded | error`
//! con protección contra respuestas fuera de orden: cada fetch lleva un
//! token de secuencia y solo la respuesta del fetch más reciente puede
//! tocar el estado. Al soltar el consumidor (salir de la vista) cualquier
//! respuesta en vuelo muere con él.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dto::record_dto::{RecordListResponse, RecordResponse, RecordWithWarranty};
use crate::models::filters::{FilterSet, ListingScope, PageWindow};
use crate::services::warranty_service;
use crate::utils::errors::AppError;

/// Página de resultados devuelta por el backend
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<RecordResponse>,
    pub total: i64,
}

impl From<RecordListResponse> for RecordPage {
    fn from(response: RecordListResponse) -> Self {
        Self {
            records: response.records,
            total: response.total,
        }
    }
}

/// Query completa de un listado: vista + filtros + ventana
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub scope: ListingScope,
    pub filters: FilterSet,
    pub window: PageWindow,
}

/// Backend capaz de resolver una página de listado
#[async_trait]
pub trait RecordSearch: Send + Sync {
    async fn fetch_page(&self, query: &ListingQuery) -> Result<RecordPage, AppError>;
}

/// Fases del consumidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Token de un fetch en curso
///
/// Solo el ticket con la secuencia más reciente puede aplicar su resultado;
/// los demás se descartan al completarse.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    pub query: ListingQuery,
}

pub struct ListingConsumer {
    scope: ListingScope,
    filters: FilterSet,
    window: PageWindow,
    phase: ListingPhase,
    records: Vec<RecordResponse>,
    total: i64,
    last_error: Option<String>,
    seq: u64,
}

impl ListingConsumer {
    pub fn new(scope: ListingScope, page_size: u32) -> Self {
        Self {
            scope,
            filters: FilterSet::default(),
            window: PageWindow::new(page_size),
            phase: ListingPhase::Idle,
            records: Vec::new(),
            total: 0,
            last_error: None,
            seq: 0,
        }
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn records(&self) -> &[RecordResponse] {
        &self.records
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.window.page
    }

    pub fn total_pages(&self) -> u32 {
        self.window.total_pages(self.total)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn begin(&mut self) -> FetchTicket {
        self.seq += 1;
        self.phase = ListingPhase::Loading;
        FetchTicket {
            seq: self.seq,
            query: ListingQuery {
                scope: self.scope,
                filters: self.filters.clone(),
                window: self.window,
            },
        }
    }

    /// Primer fetch al montar la vista
    pub fn start(&mut self) -> FetchTicket {
        self.begin()
    }

    /// Cambiar los filtros siempre vuelve a la página 1 antes del fetch
    pub fn set_filters(&mut self, filters: FilterSet) -> FetchTicket {
        self.filters = filters.normalized();
        self.window.reset();
        self.begin()
    }

    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.window.page = page.max(1);
        self.begin()
    }

    /// Aplicar el resultado de un fetch
    ///
    /// Una respuesta cuyo ticket ya no es el más reciente se descarta sin
    /// tocar nada. En error se conservan las filas mostradas y solo se
    /// marca la fase y el mensaje. Si el total encogió por debajo de la
    /// página actual, la página se ajusta y se devuelve el ticket del
    /// fetch de seguimiento.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<RecordPage, AppError>,
    ) -> Option<FetchTicket> {
        if ticket.seq != self.seq {
            log::debug!(
                "↩️ Respuesta obsoleta descartada (seq {} < {})",
                ticket.seq,
                self.seq
            );
            return None;
        }

        match result {
            Ok(page) => {
                self.records = page.records;
                self.total = page.total;
                self.phase = ListingPhase::Loaded;
                self.last_error = None;

                if self.window.clamp_to_total(page.total) {
                    return Some(self.begin());
                }
                None
            }
            Err(e) => {
                // los datos previos quedan intactos; solo se señala el fallo
                self.phase = ListingPhase::Error;
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    /// Ejecutar un ticket contra el backend, siguiendo los fetches de
    /// ajuste de página hasta estabilizar
    pub async fn run<B: RecordSearch + ?Sized>(&mut self, backend: &B, mut ticket: FetchTicket) {
        loop {
            let result = backend.fetch_page(&ticket.query).await;
            match self.complete(&ticket, result) {
                Some(next) => ticket = next,
                None => break,
            }
        }
    }
}

/// Etiquetas de garantía para mostrar junto a cada fila
///
/// Se recalculan con el reloj actual en cada render; nunca se cachean.
pub fn decorate_with_warranty(
    records: &[RecordResponse],
    today: NaiveDate,
    expiring_soon_days: u32,
) -> Vec<RecordWithWarranty> {
    records
        .iter()
        .map(|record| {
            let warranty = warranty_service::warranty_info(
                Some(record.date_of_delivery),
                today,
                expiring_soon_days,
            );
            RecordWithWarranty::new(record.clone(), warranty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::warranty::WarrantyStatus;
    use chrono::Utc;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    fn record(id: i64) -> RecordResponse {
        let now = Utc::now();
        RecordResponse {
            id,
            record_code: format!("RMZ-{:06}", id),
            created_at: now,
            updated_at: now,
            date_of_delivery: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
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
            client_name: format!("Cliente {}", id),
            client_phone: None,
            client_address: None,
            zone: Some("Delhi".to_string()),
            sale_price: None,
            sold_by: None,
            lead_source: None,
            remarks: None,
        }
    }

    fn page(ids: &[i64], total: i64) -> RecordPage {
        RecordPage {
            records: ids.iter().map(|id| record(*id)).collect(),
            total,
        }
    }

    /// Backend de prueba con respuestas encoladas
    struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<RecordPage, AppError>>>,
        queries: Mutex<Vec<ListingQuery>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<RecordPage, AppError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        async fn seen_queries(&self) -> Vec<ListingQuery> {
            self.queries.lock().await.clone()
        }
    }

    #[async_trait]
    impl RecordSearch for ScriptedBackend {
        async fn fetch_page(&self, query: &ListingQuery) -> Result<RecordPage, AppError> {
            self.queries.lock().await.push(query.clone());
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(AppError::BackendApi("sin respuesta programada".into())))
        }
    }

    #[tokio::test]
    async fn test_mount_loads_first_page() {
        let backend = ScriptedBackend::new(vec![Ok(page(&[1, 2, 3], 25))]);
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);
        assert_eq!(consumer.phase(), ListingPhase::Idle);

        let ticket = consumer.start();
        assert_eq!(consumer.phase(), ListingPhase::Loading);

        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.phase(), ListingPhase::Loaded);
        assert_eq!(consumer.records().len(), 3);
        assert_eq!(consumer.total(), 25);
        assert_eq!(consumer.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_filter_change_resets_to_page_one() {
        let backend = ScriptedBackend::new(vec![
            Ok(page(&[1], 25)),
            Ok(page(&[2], 5)),
        ]);
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

        let ticket = consumer.set_page(3);
        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.page(), 3);

        let filters = FilterSet {
            zone: Some("Delhi".to_string()),
            ..FilterSet::default()
        };
        let ticket = consumer.set_filters(filters.clone());
        assert_eq!(consumer.page(), 1);
        consumer.run(&backend, ticket).await;

        let queries = backend.seen_queries().await;
        assert_eq!(queries[1].window.page, 1);
        assert_eq!(queries[1].filters, filters);
    }

    #[tokio::test]
    async fn test_error_preserves_previous_rows() {
        let backend = ScriptedBackend::new(vec![
            Ok(page(&[1, 2], 2)),
            Err(AppError::BackendApi("backend caído".into())),
        ]);
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

        let ticket = consumer.start();
        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.records().len(), 2);

        let ticket = consumer.set_page(1);
        consumer.run(&backend, ticket).await;

        assert_eq!(consumer.phase(), ListingPhase::Error);
        // las filas anteriores siguen visibles
        assert_eq!(consumer.records().len(), 2);
        assert!(consumer.last_error().unwrap().contains("backend caído"));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

        // primer fetch en vuelo
        let old_ticket = consumer.start();
        // el usuario cambia los filtros antes de que responda
        let new_ticket = consumer.set_filters(FilterSet {
            zone: Some("Noida".to_string()),
            ..FilterSet::default()
        });

        // la respuesta vieja llega tarde: se descarta sin tocar el estado
        let follow_up = consumer.complete(&old_ticket, Ok(page(&[99], 1)));
        assert!(follow_up.is_none());
        assert_eq!(consumer.phase(), ListingPhase::Loading);
        assert!(consumer.records().is_empty());

        // la respuesta del fetch vigente sí aplica
        consumer.complete(&new_ticket, Ok(page(&[1, 2], 2)));
        assert_eq!(consumer.phase(), ListingPhase::Loaded);
        assert_eq!(consumer.records().len(), 2);
    }

    #[tokio::test]
    async fn test_page_clamps_when_total_shrinks() {
        // en la página 2 con 25 filas; tras borrados el total cae a 11 y la
        // página 2 vuelve vacía: el consumidor ajusta a página 1 y refetchea
        let backend = ScriptedBackend::new(vec![
            Ok(page(&[13, 14], 25)),
            Ok(page(&[], 11)),
            Ok(page(&[1, 2, 3], 11)),
        ]);
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

        let ticket = consumer.set_page(2);
        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.page(), 2);
        assert_eq!(consumer.total_pages(), 3);

        let ticket = consumer.set_page(2);
        consumer.run(&backend, ticket).await;

        assert_eq!(consumer.page(), 1);
        assert_eq!(consumer.phase(), ListingPhase::Loaded);
        assert_eq!(consumer.records().len(), 3);

        let queries = backend.seen_queries().await;
        assert_eq!(queries.last().unwrap().window.page, 1);
    }

    #[tokio::test]
    async fn test_total_dropping_within_page_keeps_page() {
        // total 25 -> 24 con página actual 1: nada que ajustar
        let backend = ScriptedBackend::new(vec![
            Ok(page(&[1, 2, 3], 25)),
            Ok(page(&[1, 2, 3], 24)),
        ]);
        let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

        let ticket = consumer.start();
        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.total_pages(), 3);

        let ticket = consumer.start();
        consumer.run(&backend, ticket).await;
        assert_eq!(consumer.page(), 1);
        assert_eq!(consumer.phase(), ListingPhase::Loaded);
    }

    #[test]
    fn test_decorate_with_warranty_badges() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut rows = vec![record(1), record(2)];
        rows[0].date_of_delivery = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        rows[1].date_of_delivery = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        let decorated = decorate_with_warranty(&rows, today, 30);
        assert_eq!(decorated[0].warranty_status, WarrantyStatus::InWarranty);
        assert_eq!(decorated[1].warranty_status, WarrantyStatus::OutOfWarranty);
        assert!(decorated[1].warranty_days > 0);
    }
}
