use crate::catalog::{CATEGORIES, FLOORS};
use crate::models::{ChecklistSnapshot, FloorView, ResetStatus};
use crate::persistence::{Backend, PersistenceHandle, PersistenceWorker, Persistence};
use crate::progress::build_progress;
use crate::reset::{format_timestamp, is_reset_due, months_between};
use crate::store::ChecklistStore;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ChecklistStore>>,
    pub persistence: PersistenceHandle,
    pub startup_alert: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: ChecklistStore, persistence: PersistenceHandle, startup_alert: Option<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            persistence,
            startup_alert: startup_alert.map(Arc::from),
        }
    }

    /// Loads the checklist from `backend` and starts the persistence worker.
    /// Load failures never abort startup; the checklist starts empty instead.
    pub async fn initialize(backend: Arc<dyn Persistence>) -> (Self, JoinHandle<()>) {
        let kind = backend.backend();
        let mut startup_alert = None;

        let mut store = match backend.load().await {
            Ok(Some(stored)) => stored.into_store(),
            Ok(None) => {
                info!("no stored checklist yet, starting empty");
                ChecklistStore::new()
            }
            Err(err) if kind == Backend::Remote => {
                error!("could not fetch checklist from sheet: {err}");
                startup_alert = Some(format!("Fehler beim Laden der Daten: {err}"));
                ChecklistStore::new()
            }
            Err(err) => {
                warn!("could not load stored checklist: {err}");
                ChecklistStore::new()
            }
        };

        let (persistence, worker) = PersistenceWorker::spawn(backend);

        if kind == Backend::Local && store.last_reset().is_none() {
            store.set_last_reset(Local::now());
            persistence.submit(store.to_record(), Vec::new());
        }

        (Self::new(store, persistence, startup_alert), worker)
    }

    pub fn backend(&self) -> Backend {
        self.persistence.backend()
    }

    pub fn snapshot(&self, store: &ChecklistStore, now: DateTime<Local>) -> ChecklistSnapshot {
        ChecklistSnapshot {
            backend: self.backend(),
            categories: &CATEGORIES,
            floors: FLOORS.iter().map(FloorView::from).collect(),
            entries: store.entries().clone(),
            progress: build_progress(store),
            last_reset_date: store.last_reset().map(format_timestamp),
            reset_due: self.reset_status(store, now).due,
            startup_alert: self.startup_alert.as_deref().map(str::to_string),
        }
    }

    pub fn reset_status(&self, store: &ChecklistStore, now: DateTime<Local>) -> ResetStatus {
        let supported = self.backend() == Backend::Local;
        let last_reset = store.last_reset();
        ResetStatus {
            supported,
            due: supported && is_reset_due(last_reset, now),
            months_since_reset: last_reset.map(|last| months_between(last, now)),
            last_reset_date: last_reset.map(format_timestamp),
        }
    }
}
