//! Flujo completo del núcleo cliente: búsqueda con debounce, consumidor de
//! listados y etiquetas de garantía, contra un backend en memoria.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::time::{timeout, Duration};

use maintenance_crm::clients::listing::{
    ListingConsumer, ListingPhase, ListingQuery, RecordPage, RecordSearch,
};
use maintenance_crm::clients::search::{SearchDebouncer, SEARCH_DEBOUNCE};
use maintenance_crm::dto::record_dto::RecordResponse;
use maintenance_crm::models::filters::{FilterSet, ListingScope};
use maintenance_crm::utils::errors::AppError;

fn record(id: i64, code: &str, client: &str, zone: &str, delivery: NaiveDate) -> RecordResponse {
    let now = Utc::now();
    RecordResponse {
        id,
        record_code: code.to_string(),
        created_at: now,
        updated_at: now,
        date_of_delivery: delivery,
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
        client_name: client.to_string(),
        client_phone: None,
        client_address: None,
        zone: Some(zone.to_string()),
        sale_price: None,
        sold_by: None,
        lead_source: None,
        remarks: None,
    }
}

/// Backend en memoria que aplica filtros y paginación como lo haría el real
struct InMemoryBackend {
    records: Vec<RecordResponse>,
}

impl InMemoryBackend {
    fn new(records: Vec<RecordResponse>) -> Self {
        Self { records }
    }

    fn matches(record: &RecordResponse, filters: &FilterSet) -> bool {
        if let Some(search) = &filters.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {}",
                record.record_code.to_lowercase(),
                record.client_name.to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(zone) = &filters.zone {
            if record.zone.as_deref() != Some(zone.as_str()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl RecordSearch for InMemoryBackend {
    async fn fetch_page(&self, query: &ListingQuery) -> Result<RecordPage, AppError> {
        let matching: Vec<RecordResponse> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, &query.filters))
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let offset = query.window.offset().max(0) as usize;
        let page: Vec<RecordResponse> = matching
            .into_iter()
            .skip(offset)
            .take(query.window.page_size as usize)
            .collect();

        Ok(RecordPage {
            records: page,
            total,
        })
    }
}

fn sample() -> InMemoryBackend {
    let delivery = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let mut records = Vec::new();
    for i in 1..=25 {
        let zone = if i % 2 == 0 { "Delhi" } else { "Noida" };
        records.push(record(
            i,
            &format!("RMZ-{:06}", i),
            &format!("Cliente {}", i),
            zone,
            delivery,
        ));
    }
    InMemoryBackend::new(records)
}

#[tokio::test(start_paused = true)]
async fn typing_then_committing_issues_single_filtered_fetch() {
    let backend = sample();
    let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);
    let (mut debouncer, mut commits) = SearchDebouncer::new(SEARCH_DEBOUNCE);

    // carga inicial
    let ticket = consumer.start();
    consumer.run(&backend, ticket).await;
    assert_eq!(consumer.total(), 25);
    assert_eq!(consumer.total_pages(), 3);

    // el usuario teclea "RMZ-0000" y corrige a "RMZ-000007" sin pausa
    debouncer.set_search_text("RMZ-0000");
    debouncer.set_search_text("RMZ-000007");

    // exactamente un commit, con el texto final
    let committed = commits.recv().await.unwrap();
    assert_eq!(committed.search.as_deref(), Some("RMZ-000007"));
    assert!(commits.try_recv().is_err());

    // el commit alimenta al consumidor, que vuelve a la página 1
    let ticket = consumer.set_filters(committed);
    consumer.run(&backend, ticket).await;

    assert_eq!(consumer.phase(), ListingPhase::Loaded);
    assert_eq!(consumer.total(), 1);
    assert_eq!(consumer.records()[0].record_code, "RMZ-000007");
    assert_eq!(consumer.page(), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_filters_cancels_pending_search_and_fetches_everything() {
    let backend = sample();
    let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);
    let (mut debouncer, mut commits) = SearchDebouncer::new(SEARCH_DEBOUNCE);

    // búsqueda pendiente de commit cuando el usuario limpia los filtros
    debouncer.set_search_text("RMZ-000007");
    debouncer.clear();

    // el commit inmediato es el conjunto vacío
    let committed = commits.try_recv().unwrap();
    assert!(committed.is_empty());

    let ticket = consumer.set_filters(committed);
    consumer.run(&backend, ticket).await;
    assert_eq!(consumer.total(), 25);

    // y el commit de la búsqueda cancelada no llega nunca
    let late = timeout(Duration::from_millis(600), commits.recv()).await;
    assert!(late.is_err());
}

#[tokio::test]
async fn dropdown_filter_commits_immediately_and_resets_page() {
    let backend = sample();
    let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);
    let (mut debouncer, mut commits) = SearchDebouncer::new(SEARCH_DEBOUNCE);

    let ticket = consumer.start();
    consumer.run(&backend, ticket).await;

    let ticket = consumer.set_page(3);
    consumer.run(&backend, ticket).await;
    assert_eq!(consumer.page(), 3);

    // cambio de desplegable: sin debounce
    debouncer.set_filter(|f| f.zone = Some("Delhi".to_string()));
    let committed = commits.try_recv().unwrap();

    let ticket = consumer.set_filters(committed);
    assert_eq!(consumer.page(), 1);
    consumer.run(&backend, ticket).await;

    assert_eq!(consumer.total(), 12);
    assert!(consumer
        .records()
        .iter()
        .all(|r| r.zone.as_deref() == Some("Delhi")));
}

#[tokio::test]
async fn out_of_order_responses_never_overwrite_newer_state() {
    let backend = sample();
    let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

    // fetch A en vuelo; el usuario cambia el filtro y dispara el fetch B
    let ticket_a = consumer.start();
    let ticket_b = consumer.set_filters(FilterSet {
        zone: Some("Delhi".to_string()),
        ..FilterSet::default()
    });

    // B resuelve primero
    let result_b = backend.fetch_page(&ticket_b.query).await;
    consumer.complete(&ticket_b, result_b);
    assert_eq!(consumer.phase(), ListingPhase::Loaded);
    assert_eq!(consumer.total(), 12);

    // A llega tarde: su resultado se descarta
    let result_a = backend.fetch_page(&ticket_a.query).await;
    let follow_up = consumer.complete(&ticket_a, result_a);
    assert!(follow_up.is_none());
    assert_eq!(consumer.total(), 12);
    assert!(consumer
        .records()
        .iter()
        .all(|r| r.zone.as_deref() == Some("Delhi")));
}

#[tokio::test]
async fn shrinking_total_clamps_page_and_refetches() {
    // 25 registros, página 2; tras un borrado masivo quedan 11
    let mut backend = sample();
    let mut consumer = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);

    let ticket = consumer.set_page(2);
    consumer.run(&backend, ticket).await;
    assert_eq!(consumer.page(), 2);
    assert_eq!(consumer.total_pages(), 3);

    backend.records.truncate(11);

    let ticket = consumer.set_page(2);
    consumer.run(&backend, ticket).await;

    // la página se ajusta a 1 y el refetch trae la primera página real
    assert_eq!(consumer.page(), 1);
    assert_eq!(consumer.total(), 11);
    assert_eq!(consumer.records().len(), 11);
    assert_eq!(consumer.phase(), ListingPhase::Loaded);
}

#[tokio::test]
async fn each_view_owns_independent_state() {
    let backend = sample();
    let mut maintenance = ListingConsumer::new(ListingScope::MaintenanceRecords, 12);
    let mut sales = ListingConsumer::new(ListingScope::SalesRecords, 12);

    let ticket = maintenance.set_filters(FilterSet {
        zone: Some("Delhi".to_string()),
        ..FilterSet::default()
    });
    maintenance.run(&backend, ticket).await;

    let ticket = sales.start();
    sales.run(&backend, ticket).await;

    // filtrar la vista de mantenimiento no afecta a la de ventas
    assert_eq!(maintenance.total(), 12);
    assert_eq!(sales.total(), 25);
    assert!(sales.filters().is_empty());
}
