use serde::Serialize;

pub type Room = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Floor {
    pub number: u8,
    pub rooms: &'static [Room],
}

impl Floor {
    /// Display label, e.g. "Etage 1 (Zimmer 101-144)".
    pub fn label(&self) -> String {
        match (self.rooms.first(), self.rooms.last()) {
            (Some(first), Some(last)) => {
                format!("Etage {} (Zimmer {first}-{last})", self.number)
            }
            _ => format!("Etage {}", self.number),
        }
    }
}

pub static CATEGORIES: [Category; 5] = [
    Category { id: "duschlippen", name: "Duschlippen" },
    Category { id: "filter", name: "filter gereinigt" },
    Category { id: "wasserhahn", name: "wasserhahn einsatz" },
    Category { id: "silikon", name: "silikon erneuert" },
    Category { id: "sonstige", name: "sonstige mangel" },
];

const FLOOR_1: [Room; 34] = [
    101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 113, 114, 115, 116, 117, 118, 119,
    120, 121, 122, 123, 125, 127, 129, 131, 132, 133, 134, 136, 138, 140, 142, 144,
];

const FLOOR_2: [Room; 40] = [
    201, 202, 203, 204, 205, 206, 207, 208, 209, 210, 211, 212, 213, 214, 215, 216, 217, 218,
    219, 220, 221, 222, 223, 224, 225, 226, 227, 228, 229, 230, 231, 232, 233, 234, 235, 236,
    237, 238, 239, 240,
];

const FLOOR_3: [Room; 40] = [
    301, 302, 303, 304, 305, 306, 307, 308, 309, 310, 311, 312, 313, 314, 315, 316, 317, 318,
    319, 320, 321, 322, 323, 324, 325, 326, 327, 328, 329, 330, 331, 332, 333, 334, 335, 336,
    337, 338, 339, 340,
];

pub static FLOORS: [Floor; 3] = [
    Floor { number: 1, rooms: &FLOOR_1 },
    Floor { number: 2, rooms: &FLOOR_2 },
    Floor { number: 3, rooms: &FLOOR_3 },
];

pub fn default_category() -> &'static Category {
    &CATEGORIES[0]
}

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.id == id)
}

/// Matches either the id or the display name, ignoring case. Spreadsheet rows
/// are keyed by whatever the sheet's editors typed.
pub fn category_by_label(label: &str) -> Option<&'static Category> {
    let label = label.trim();
    CATEGORIES
        .iter()
        .find(|category| category.id.eq_ignore_ascii_case(label) || category.name.eq_ignore_ascii_case(label))
}

pub fn rooms() -> impl Iterator<Item = Room> {
    FLOORS.iter().flat_map(|floor| floor.rooms.iter().copied())
}

pub fn contains_room(room: Room) -> bool {
    FLOORS.iter().any(|floor| floor.rooms.contains(&room))
}

pub fn room_count() -> usize {
    FLOORS.iter().map(|floor| floor.rooms.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_expected_shape() {
        assert_eq!(CATEGORIES.len(), 5);
        assert_eq!(room_count(), 114);
        assert_eq!(rooms().count(), room_count());
        assert!(contains_room(144));
        assert!(!contains_room(112));
        assert!(!contains_room(341));
    }

    #[test]
    fn floor_labels_use_first_and_last_room() {
        assert_eq!(FLOORS[0].label(), "Etage 1 (Zimmer 101-144)");
        assert_eq!(FLOORS[2].label(), "Etage 3 (Zimmer 301-340)");
    }

    #[test]
    fn category_lookup_by_label_ignores_case() {
        assert_eq!(category_by_label("Duschlippen").map(|c| c.id), Some("duschlippen"));
        assert_eq!(category_by_label("FILTER").map(|c| c.id), Some("filter"));
        assert_eq!(category_by_label(" silikon erneuert ").map(|c| c.id), Some("silikon"));
        assert!(category_by_label("unknown").is_none());
        assert!(category("Duschlippen").is_none());
    }
}
