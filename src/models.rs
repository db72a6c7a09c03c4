use crate::catalog::{Category, Floor, Room};
use crate::persistence::Backend;
use crate::progress::CategoryProgress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Durable shape of the checklist. Field names match the record written by
/// earlier deployments so existing files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistRecord {
    pub checklist_data: BTreeMap<String, BTreeMap<Room, bool>>,
    pub notes: BTreeMap<String, BTreeMap<Room, String>>,
    pub last_reset_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Entry {
    pub checked: bool,
    pub note: String,
}

impl Entry {
    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// One (category, room) pair after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpdate {
    pub category: &'static Category,
    pub room: Room,
    pub checked: bool,
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCheckedRequest {
    pub checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetNoteRequest {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetReason {
    Auto,
    Manual,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub reason: ResetReason,
}

#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    pub tab: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FloorView {
    pub number: u8,
    pub label: String,
    pub rooms: &'static [Room],
}

impl From<&Floor> for FloorView {
    fn from(floor: &Floor) -> Self {
        Self {
            number: floor.number,
            label: floor.label(),
            rooms: floor.rooms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChecklistSnapshot {
    pub backend: Backend,
    pub categories: &'static [Category],
    pub floors: Vec<FloorView>,
    pub entries: BTreeMap<&'static str, BTreeMap<Room, Entry>>,
    pub progress: Vec<CategoryProgress>,
    pub last_reset_date: Option<String>,
    pub reset_due: bool,
    pub startup_alert: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetStatus {
    pub supported: bool,
    pub due: bool,
    pub months_since_reset: Option<i32>,
    pub last_reset_date: Option<String>,
}
