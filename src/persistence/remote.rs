use super::{Backend, PersistError, Persistence, StoredChecklist};
use crate::catalog::Room;
use crate::models::{ChecklistRecord, EntryUpdate};
use crate::store::RemoteEntry;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Spreadsheet-backed HTTP endpoint. `GET` returns every row, `POST` upserts
/// one row. Last write wins; there is no retry and no conflict detection.
#[derive(Debug, Clone)]
pub struct RemoteSheet {
    client: Client,
    endpoint: String,
}

/// Row as the sheet serves it. Cells come back loosely typed.
#[derive(Debug, Deserialize)]
struct SheetRow {
    category: String,
    room: RoomCell,
    #[serde(default)]
    checked: CheckedCell,
    #[serde(default)]
    note: NoteCell,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomCell {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckedCell {
    Flag(bool),
    Text(String),
    Other(serde_json::Value),
}

impl Default for CheckedCell {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Sheets turn notes like `42` into numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NoteCell {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl Default for NoteCell {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Serialize)]
struct SheetUpdate<'a> {
    category: &'a str,
    room: Room,
    checked: bool,
    note: &'a str,
}

impl RoomCell {
    fn room(&self) -> Option<Room> {
        match self {
            Self::Number(value) => Room::try_from(*value).ok(),
            Self::Text(value) => value.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

impl NoteCell {
    fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
            Self::Other(_) => String::new(),
        }
    }
}

impl CheckedCell {
    fn is_checked(&self) -> bool {
        match self {
            Self::Flag(value) => *value,
            Self::Text(value) => value == "TRUE" || value == "true",
            Self::Other(_) => false,
        }
    }
}

impl RemoteSheet {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PersistError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn post_update(&self, update: &EntryUpdate) -> Result<(), PersistError> {
        let body = SheetUpdate {
            category: update.category.name,
            room: update.room,
            checked: update.checked,
            note: &update.note,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(PersistError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

/// The body must be an array; a row that cannot be read is skipped on its own.
pub(crate) fn decode_rows(bytes: &[u8]) -> Result<Vec<RemoteEntry>, PersistError> {
    let rows: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    Ok(rows
        .into_iter()
        .filter_map(|raw| {
            let row: SheetRow = match serde_json::from_value(raw) {
                Ok(row) => row,
                Err(err) => {
                    debug!("skipping unreadable sheet row: {err}");
                    return None;
                }
            };
            let Some(room) = row.room.room() else {
                debug!(category = %row.category, room = ?row.room, "skipping sheet row without a usable room");
                return None;
            };
            Some(RemoteEntry {
                category: row.category,
                room,
                checked: row.checked.is_checked(),
                note: row.note.into_text(),
            })
        })
        .collect())
}

#[async_trait]
impl Persistence for RemoteSheet {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    async fn load(&self) -> Result<Option<StoredChecklist>, PersistError> {
        let response = self.client.get(&self.endpoint).send().await?;
        if !response.status().is_success() {
            return Err(PersistError::Status {
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(Some(StoredChecklist::Rows(decode_rows(&bytes)?)))
    }

    async fn persist(&self, _record: &ChecklistRecord, updates: &[EntryUpdate]) -> Result<(), PersistError> {
        let mut first_error = None;
        for update in updates {
            if let Err(err) = self.post_update(update).await {
                warn!(category = update.category.id, room = update.room, "sheet update failed: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_loosely_typed_rows() {
        let body = serde_json::json!([
            { "category": "Duschlippen", "room": 101, "checked": "TRUE", "note": "leak" },
            { "category": "filter", "room": "102", "checked": true },
            { "category": "filter", "room": 103, "checked": "true", "note": null },
            { "category": "filter", "room": 104, "checked": "FALSE", "note": "" },
            { "category": "filter", "room": 105, "checked": 1 },
            { "category": "filter", "room": "Zimmer", "checked": true },
            { "category": "filter", "room": 70000, "checked": true },
            { "category": "filter", "room": null, "checked": true },
            { "category": "filter", "room": 106, "checked": true, "note": 42 },
            { "room": 107, "checked": true }
        ]);
        let rows = decode_rows(body.to_string().as_bytes()).unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(
            rows[0],
            RemoteEntry {
                category: "Duschlippen".to_string(),
                room: 101,
                checked: true,
                note: "leak".to_string(),
            }
        );
        assert!(rows[1].checked);
        assert_eq!(rows[1].room, 102);
        assert!(rows[2].checked);
        assert_eq!(rows[2].note, "");
        assert!(!rows[3].checked);
        assert!(!rows[4].checked);
        assert_eq!(rows[5].room, 106);
        assert!(rows[5].checked);
        assert_eq!(rows[5].note, "42");
    }

    #[test]
    fn non_array_body_is_rejected() {
        let err = decode_rows(br#"{"error":"quota"}"#).unwrap_err();
        assert!(matches!(err, PersistError::Serialization(_)));
    }

    #[test]
    fn update_body_uses_display_name() {
        let body = serde_json::to_value(SheetUpdate {
            category: "filter gereinigt",
            room: 210,
            checked: true,
            note: "ok",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "category": "filter gereinigt", "room": 210, "checked": true, "note": "ok" })
        );
    }
}
