//! Núcleo cliente
//!
//! Este módulo contiene la parte cliente de la aplicación: el cliente HTTP
//! de la API, el consumidor de listados paginados, la búsqueda con debounce
//! y el contexto de sesión.

pub mod crm_api_client;
pub mod listing;
pub mod search;
pub mod session;

pub use crm_api_client::{CrmApiClient, ExportKind};
pub use listing::{ListingConsumer, ListingPhase, ListingQuery, RecordPage, RecordSearch};
pub use search::{SearchDebouncer, SEARCH_DEBOUNCE};
pub use session::SessionContext;
