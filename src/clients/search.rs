//! Búsqueda con debounce
//!
//! El texto libre no dispara una query por tecla: cada tecla actualiza el
//! borrador al instante y programa el commit tras 500 ms de inactividad;
//! una tecla nueva dentro de la ventana cancela y reprograma. Los filtros
//! de desplegable (igualdad exacta) comitean inmediatamente, sin debounce.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::models::filters::FilterSet;

/// Ventana de inactividad antes de comitear la búsqueda
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Editor de filtros con commit diferido para el texto de búsqueda
///
/// Los commits salen por el canal devuelto en `new`; el consumidor del
/// listado los recibe y refetchea. Soltar el editor (desmontar la vista)
/// aborta cualquier commit pendiente para que no llegue ninguno tardío.
pub struct SearchDebouncer {
    delay: Duration,
    draft: FilterSet,
    tx: mpsc::UnboundedSender<FilterSet>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<FilterSet>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                draft: FilterSet::default(),
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Borrador actual (lo que ve el input mientras se escribe)
    pub fn draft(&self) -> &FilterSet {
        &self.draft
    }

    pub fn has_pending_commit(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn schedule_commit(&mut self) {
        self.cancel_pending();

        let tx = self.tx.clone();
        let committed = self.draft.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(committed);
        }));
    }

    /// Tecla en el campo de búsqueda: borrador inmediato, commit diferido
    ///
    /// Un input vaciado se normaliza a "sin restricción", nunca viaja como
    /// string vacío.
    pub fn set_search_text(&mut self, text: &str) {
        let trimmed = text.trim();
        self.draft.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.schedule_commit();
    }

    /// Cambio de un filtro categórico: commit inmediato
    ///
    /// El commit lleva el borrador completo (incluido el texto de búsqueda
    /// ya tecleado), así que el commit diferido pendiente se cancela.
    pub fn set_filter<F: FnOnce(&mut FilterSet)>(&mut self, apply: F) {
        apply(&mut self.draft);
        self.draft = self.draft.clone().normalized();
        self.cancel_pending();
        let _ = self.tx.send(self.draft.clone());
    }

    /// Limpiar todos los filtros: cancela el commit pendiente y emite el
    /// conjunto vacío inmediatamente
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.draft = FilterSet::default();
        let _ = self.tx.send(self.draft.clone());
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
