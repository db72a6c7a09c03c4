use crate::catalog::{self, Category, Room, CATEGORIES};
use crate::models::{ChecklistRecord, Entry, EntryUpdate};
use crate::reset::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    #[error("unknown room {0}")]
    UnknownRoom(Room),
}

/// Row fetched from the remote sheet, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub category: String,
    pub room: Room,
    pub checked: bool,
    pub note: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemoteApplySummary {
    pub applied: usize,
    pub skipped: usize,
}

/// In-memory checklist. Always covers every (category, room) pair of the
/// catalog and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistStore {
    entries: BTreeMap<&'static str, BTreeMap<Room, Entry>>,
    last_reset: Option<DateTime<Local>>,
}

impl Default for ChecklistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecklistStore {
    pub fn new() -> Self {
        let entries = CATEGORIES
            .iter()
            .map(|category| {
                let rooms = catalog::rooms().map(|room| (room, Entry::default())).collect();
                (category.id, rooms)
            })
            .collect();
        Self {
            entries,
            last_reset: None,
        }
    }

    /// Seeds a store from a persisted record. Pairs missing from the record
    /// default to unchecked/empty; pairs outside the catalog are dropped.
    pub fn from_record(record: &ChecklistRecord) -> Self {
        let mut store = Self::new();
        let mut dropped = 0usize;

        for (category_id, rooms) in &record.checklist_data {
            for (room, checked) in rooms {
                match store.entry_mut(category_id, *room) {
                    Ok(entry) => entry.checked = *checked,
                    Err(_) => dropped += 1,
                }
            }
        }
        for (category_id, rooms) in &record.notes {
            for (room, note) in rooms {
                match store.entry_mut(category_id, *room) {
                    Ok(entry) => entry.note = note.clone(),
                    Err(_) => dropped += 1,
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, "ignored stored entries outside the catalog");
        }

        store.last_reset = record.last_reset_date.as_deref().and_then(parse_timestamp);
        store
    }

    pub fn to_record(&self) -> ChecklistRecord {
        let mut record = ChecklistRecord {
            last_reset_date: self.last_reset.map(format_timestamp),
            ..ChecklistRecord::default()
        };
        for (category_id, rooms) in &self.entries {
            record.checklist_data.insert(
                category_id.to_string(),
                rooms.iter().map(|(room, entry)| (*room, entry.checked)).collect(),
            );
            record.notes.insert(
                category_id.to_string(),
                rooms.iter().map(|(room, entry)| (*room, entry.note.clone())).collect(),
            );
        }
        record
    }

    pub fn get(&self, category_id: &str, room: Room) -> Result<&Entry, StoreError> {
        let category = resolve_category(category_id)?;
        self.entries
            .get(category.id)
            .and_then(|rooms| rooms.get(&room))
            .ok_or(StoreError::UnknownRoom(room))
    }

    pub fn set_checked(&mut self, category_id: &str, room: Room, checked: bool) -> Result<EntryUpdate, StoreError> {
        let category = resolve_category(category_id)?;
        let entry = self.entry_mut(category.id, room)?;
        entry.checked = checked;
        Ok(update(category, room, entry))
    }

    pub fn set_note(&mut self, category_id: &str, room: Room, note: impl Into<String>) -> Result<EntryUpdate, StoreError> {
        let category = resolve_category(category_id)?;
        let entry = self.entry_mut(category.id, room)?;
        entry.note = note.into();
        Ok(update(category, room, entry))
    }

    /// Marks every room of one category. Returns one update per room in
    /// catalog order.
    pub fn set_all_in_category(&mut self, category_id: &str, checked: bool) -> Result<Vec<EntryUpdate>, StoreError> {
        let category = resolve_category(category_id)?;
        let rooms = self
            .entries
            .get_mut(category.id)
            .ok_or_else(|| StoreError::UnknownCategory(category_id.to_string()))?;

        Ok(catalog::rooms()
            .filter_map(|room| {
                let entry = rooms.get_mut(&room)?;
                entry.checked = checked;
                Some(update(category, room, entry))
            })
            .collect())
    }

    /// Overwrites local entries with fetched rows. Rows that do not name a
    /// catalog pair are skipped.
    pub fn apply_remote(&mut self, rows: &[RemoteEntry]) -> RemoteApplySummary {
        let mut summary = RemoteApplySummary::default();
        for row in rows {
            let Some(category) = catalog::category_by_label(&row.category) else {
                debug!(category = %row.category, room = row.room, "skipping remote row with unknown category");
                summary.skipped += 1;
                continue;
            };
            match self.entry_mut(category.id, row.room) {
                Ok(entry) => {
                    entry.checked = row.checked;
                    entry.note = row.note.clone();
                    summary.applied += 1;
                }
                Err(_) => {
                    debug!(category = category.id, room = row.room, "skipping remote row with unknown room");
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    /// Clears every entry and stamps the reset marker.
    pub fn reset(&mut self, now: DateTime<Local>) {
        *self = Self::new();
        self.last_reset = Some(now);
    }

    pub fn last_reset(&self) -> Option<DateTime<Local>> {
        self.last_reset
    }

    pub fn set_last_reset(&mut self, value: DateTime<Local>) {
        self.last_reset = Some(value);
    }

    pub fn category_entries(&self, category: &Category) -> Option<&BTreeMap<Room, Entry>> {
        self.entries.get(category.id)
    }

    pub fn entries(&self) -> &BTreeMap<&'static str, BTreeMap<Room, Entry>> {
        &self.entries
    }

    /// (completed, total) for one category.
    pub fn completion_counts(&self, category: &Category) -> (usize, usize) {
        self.entries
            .get(category.id)
            .map(|rooms| (rooms.values().filter(|entry| entry.checked).count(), rooms.len()))
            .unwrap_or((0, 0))
    }

    fn entry_mut(&mut self, category_id: &str, room: Room) -> Result<&mut Entry, StoreError> {
        self.entries
            .get_mut(category_id)
            .ok_or_else(|| StoreError::UnknownCategory(category_id.to_string()))?
            .get_mut(&room)
            .ok_or(StoreError::UnknownRoom(room))
    }
}

fn resolve_category(category_id: &str) -> Result<&'static Category, StoreError> {
    catalog::category(category_id).ok_or_else(|| StoreError::UnknownCategory(category_id.to_string()))
}

fn update(category: &'static Category, room: Room, entry: &Entry) -> EntryUpdate {
    EntryUpdate {
        category,
        room,
        checked: entry.checked,
        note: entry.note.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{room_count, FLOORS};
    use chrono::TimeZone;

    #[test]
    fn new_store_covers_catalog_with_defaults() {
        let store = ChecklistStore::new();
        for category in &CATEGORIES {
            for room in catalog::rooms() {
                assert_eq!(store.get(category.id, room).unwrap(), &Entry::default());
            }
            assert_eq!(store.category_entries(category).unwrap().len(), room_count());
        }
        assert!(store.last_reset().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut store = ChecklistStore::new();
        assert_eq!(
            store.set_checked("pool", 101, true),
            Err(StoreError::UnknownCategory("pool".to_string()))
        );
        assert_eq!(store.set_note("filter", 112, "x"), Err(StoreError::UnknownRoom(112)));
        assert!(store.get("filter", 999).is_err());
        assert!(store.set_all_in_category("pool", true).is_err());
    }

    #[test]
    fn set_checked_and_note_return_updates() {
        let mut store = ChecklistStore::new();
        let update = store.set_checked("duschlippen", 205, true).unwrap();
        assert_eq!(update.category.id, "duschlippen");
        assert_eq!(update.room, 205);
        assert!(update.checked);

        let update = store.set_note("duschlippen", 205, "tropft").unwrap();
        assert!(update.checked);
        assert_eq!(update.note, "tropft");
        assert_eq!(
            store.get("duschlippen", 205).unwrap(),
            &Entry { checked: true, note: "tropft".to_string() }
        );
        assert_eq!(store.get("filter", 205).unwrap(), &Entry::default());
    }

    #[test]
    fn set_all_only_touches_one_category() {
        let mut store = ChecklistStore::new();
        let updates = store.set_all_in_category("wasserhahn", true).unwrap();
        assert_eq!(updates.len(), room_count());
        assert_eq!(updates[0].room, FLOORS[0].rooms[0]);

        let (completed, total) = store.completion_counts(catalog::category("wasserhahn").unwrap());
        assert_eq!(completed, total);
        let (completed, _) = store.completion_counts(catalog::category("filter").unwrap());
        assert_eq!(completed, 0);

        store.set_all_in_category("wasserhahn", false).unwrap();
        let (completed, _) = store.completion_counts(catalog::category("wasserhahn").unwrap());
        assert_eq!(completed, 0);
    }

    #[test]
    fn record_round_trip_preserves_entries() {
        let mut store = ChecklistStore::new();
        store.set_checked("filter", 101, true).unwrap();
        store.set_note("sonstige", 340, "Fenster klemmt").unwrap();
        store.set_last_reset(Local.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap());

        let json = serde_json::to_string(&store.to_record()).unwrap();
        let record: ChecklistRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(ChecklistStore::from_record(&record), store);
    }

    #[test]
    fn from_record_fills_gaps_and_drops_foreign_keys() {
        let record: ChecklistRecord = serde_json::from_value(serde_json::json!({
            "checklistData": {
                "filter": { "101": true, "999": true },
                "pool": { "101": true }
            },
            "notes": { "filter": { "102": "Kalk" } },
            "lastResetDate": null
        }))
        .unwrap();

        let store = ChecklistStore::from_record(&record);
        assert!(store.get("filter", 101).unwrap().checked);
        assert_eq!(store.get("filter", 102).unwrap().note, "Kalk");
        assert_eq!(store.get("silikon", 101).unwrap(), &Entry::default());
        assert!(store.get("filter", 999).is_err());
        assert_eq!(store.entries().len(), CATEGORIES.len());
    }

    #[test]
    fn apply_remote_accepts_display_names() {
        let mut store = ChecklistStore::new();
        let summary = store.apply_remote(&[
            RemoteEntry {
                category: "Duschlippen".to_string(),
                room: 101,
                checked: true,
                note: "leak".to_string(),
            },
            RemoteEntry {
                category: "Duschlippen".to_string(),
                room: 999,
                checked: true,
                note: String::new(),
            },
            RemoteEntry {
                category: "Sauna".to_string(),
                room: 101,
                checked: true,
                note: String::new(),
            },
        ]);

        assert_eq!(summary, RemoteApplySummary { applied: 1, skipped: 2 });
        assert_eq!(
            store.get("duschlippen", 101).unwrap(),
            &Entry { checked: true, note: "leak".to_string() }
        );
    }

    #[test]
    fn reset_clears_everything_and_stamps_marker() {
        let mut store = ChecklistStore::new();
        store.set_all_in_category("filter", true).unwrap();
        store.set_note("filter", 101, "x").unwrap();

        let now = Local.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        store.reset(now);

        assert_eq!(store.last_reset(), Some(now));
        assert_eq!(store.get("filter", 101).unwrap(), &Entry::default());
        let (completed, _) = store.completion_counts(catalog::category("filter").unwrap());
        assert_eq!(completed, 0);
    }
}
