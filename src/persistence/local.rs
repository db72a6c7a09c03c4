use super::{Backend, PersistError, Persistence, StoredChecklist};
use crate::models::{ChecklistRecord, EntryUpdate};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Whole-record JSON file.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Persistence for LocalFile {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    async fn load(&self) -> Result<Option<StoredChecklist>, PersistError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(StoredChecklist::Record(serde_json::from_slice(&bytes)?))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, record: &ChecklistRecord, _updates: &[EntryUpdate]) -> Result<(), PersistError> {
        let payload = serde_json::to_vec_pretty(record)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        // Write beside the target and rename so a crash never leaves half a file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
