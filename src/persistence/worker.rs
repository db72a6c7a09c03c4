use super::{Backend, PersistError, Persistence};
use crate::models::{ChecklistRecord, EntryUpdate};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Jobs waiting for the backend.
pub const QUEUE_CAPACITY: usize = 64;

struct PersistJob {
    record: ChecklistRecord,
    updates: Vec<EntryUpdate>,
    ack: Option<oneshot::Sender<Result<(), PersistError>>>,
}

/// Background task that owns the backend and applies jobs one at a time in
/// the order they were submitted.
pub struct PersistenceWorker {
    backend: Arc<dyn Persistence>,
    receiver: mpsc::Receiver<PersistJob>,
}

/// Cheap cloneable sender side of the worker.
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: mpsc::Sender<PersistJob>,
    backend: Backend,
}

impl PersistenceWorker {
    pub fn new(backend: Arc<dyn Persistence>) -> (Self, PersistenceHandle) {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let handle = PersistenceHandle {
            sender,
            backend: backend.backend(),
        };
        (Self { backend, receiver }, handle)
    }

    /// Starts the worker on the runtime. The task ends once every handle is
    /// dropped and the queue is drained.
    pub fn spawn(backend: Arc<dyn Persistence>) -> (PersistenceHandle, JoinHandle<()>) {
        let (worker, handle) = Self::new(backend);
        (handle, tokio::spawn(worker.run()))
    }

    pub async fn run(mut self) {
        debug!(backend = ?self.backend.backend(), "persistence worker started");
        while let Some(job) = self.receiver.recv().await {
            let result = self.backend.persist(&job.record, &job.updates).await;
            if let Err(err) = &result {
                warn!(updates = job.updates.len(), "could not persist checklist: {err}");
            }
            if let Some(ack) = job.ack {
                let _ = ack.send(result);
            }
        }
        info!("persistence worker stopped");
    }
}

impl PersistenceHandle {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Queues a write and returns immediately. The outcome is only logged,
    /// and a write that finds the queue full is dropped.
    pub fn submit(&self, record: ChecklistRecord, updates: Vec<EntryUpdate>) {
        let job = PersistJob {
            record,
            updates,
            ack: None,
        };
        if let Err(err) = self.enqueue(job) {
            warn!("change kept in memory only: {err}");
        }
    }

    /// Queues a write and returns a [`PendingWrite`] that resolves once the
    /// backend has handled it. Queue order is fixed when this returns, so
    /// callers may release locks before awaiting [`PendingWrite::wait`].
    pub fn submit_and_wait(&self, record: ChecklistRecord, updates: Vec<EntryUpdate>) -> PendingWrite {
        let (ack, done) = oneshot::channel();
        let job = PersistJob {
            record,
            updates,
            ack: Some(ack),
        };
        PendingWrite {
            done: self.enqueue(job).map(|()| done),
        }
    }

    fn enqueue(&self, job: PersistJob) -> Result<(), PersistError> {
        match self.sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(PersistError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(PersistError::WorkerGone),
        }
    }
}

pub struct PendingWrite {
    done: Result<oneshot::Receiver<Result<(), PersistError>>, PersistError>,
}

impl PendingWrite {
    pub async fn wait(self) -> Result<(), PersistError> {
        self.done?.await.unwrap_or(Err(PersistError::WorkerGone))
    }
}
