//! Durable storage for the checklist, behind one active backend per process.

pub mod local;
pub mod remote;
pub mod worker;

use crate::config::{BackendKind, Config};
use crate::models::{ChecklistRecord, EntryUpdate};
use crate::store::{ChecklistStore, RemoteEntry};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub use local::LocalFile;
pub use remote::RemoteSheet;
pub use worker::{PendingWrite, PersistenceHandle, PersistenceWorker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Local,
    Remote,
}

/// What a backend hands back at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredChecklist {
    /// A full record written by [`LocalFile`].
    Record(ChecklistRecord),
    /// Individual rows from the remote sheet, overlaid onto defaults.
    Rows(Vec<RemoteEntry>),
}

impl StoredChecklist {
    pub fn into_store(self) -> ChecklistStore {
        match self {
            Self::Record(record) => ChecklistStore::from_record(&record),
            Self::Rows(rows) => {
                let mut store = ChecklistStore::new();
                let summary = store.apply_remote(&rows);
                info!(applied = summary.applied, skipped = summary.skipped, "applied remote checklist rows");
                store
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed checklist data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("remote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote endpoint answered {status}")]
    Status { status: u16 },

    #[error("persistence worker is not running")]
    WorkerGone,

    #[error("persistence queue is full")]
    QueueFull,
}

#[async_trait]
pub trait Persistence: Send + Sync {
    fn backend(&self) -> Backend;

    /// Reads the stored checklist. `Ok(None)` means nothing was stored yet.
    async fn load(&self) -> Result<Option<StoredChecklist>, PersistError>;

    /// Stores the outcome of one mutation. `record` is the full state after
    /// the mutation and `updates` the entries it changed; each backend uses
    /// whichever it needs.
    async fn persist(&self, record: &ChecklistRecord, updates: &[EntryUpdate]) -> Result<(), PersistError>;
}

pub fn build(config: &Config) -> Result<Arc<dyn Persistence>, PersistError> {
    let backend: Arc<dyn Persistence> = match &config.backend {
        BackendKind::Local { data_path } => Arc::new(LocalFile::new(data_path.clone())),
        BackendKind::Remote { endpoint, timeout } => Arc::new(RemoteSheet::new(endpoint.clone(), *timeout)?),
    };
    Ok(backend)
}
