use crate::catalog::{Category, CATEGORIES};
use crate::store::ChecklistStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTier {
    Error,
    Warning,
    Success,
}

impl ProgressTier {
    pub fn from_counts(completed: usize, total: usize) -> Self {
        if completed == 0 {
            Self::Error
        } else if completed < total {
            Self::Warning
        } else {
            Self::Success
        }
    }

    /// CSS colour variable used for the bar fill.
    pub fn color_var(self) -> &'static str {
        match self {
            Self::Error => "var(--color-error)",
            Self::Warning => "var(--color-warning)",
            Self::Success => "var(--color-success)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub category: &'static str,
    pub name: &'static str,
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
    pub tier: ProgressTier,
}

impl CategoryProgress {
    pub fn summary(&self) -> String {
        format!("{} von {} erledigt", self.completed, self.total)
    }
}

pub fn build_progress(store: &ChecklistStore) -> Vec<CategoryProgress> {
    CATEGORIES
        .iter()
        .map(|category| category_progress(store, category))
        .collect()
}

pub fn category_progress(store: &ChecklistStore, category: &'static Category) -> CategoryProgress {
    let (completed, total) = store.completion_counts(category);
    CategoryProgress {
        category: category.id,
        name: category.name,
        completed,
        total,
        percent: percent(completed, total),
        tier: ProgressTier::from_counts(completed, total),
    }
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::room_count;

    #[test]
    fn empty_store_is_all_error_tier() {
        let store = ChecklistStore::new();
        let progress = build_progress(&store);
        assert_eq!(progress.len(), 5);
        for item in &progress {
            assert_eq!(item.completed, 0);
            assert_eq!(item.total, room_count());
            assert_eq!(item.percent, 0.0);
            assert_eq!(item.tier, ProgressTier::Error);
        }
    }

    #[test]
    fn partial_category_is_warning_tier() {
        let mut store = ChecklistStore::new();
        store.set_checked("filter", 101, true).unwrap();
        store.set_checked("filter", 340, true).unwrap();

        let filter = category_progress(&store, crate::catalog::category("filter").unwrap());
        assert_eq!(filter.completed, 2);
        assert_eq!(filter.tier, ProgressTier::Warning);
        assert!(filter.percent > 0.0 && filter.percent < 100.0);
        assert_eq!(filter.summary(), format!("2 von {} erledigt", room_count()));
    }

    #[test]
    fn full_category_is_success_tier() {
        let mut store = ChecklistStore::new();
        store.set_all_in_category("silikon", true).unwrap();

        let progress = build_progress(&store);
        let silikon = progress.iter().find(|p| p.category == "silikon").unwrap();
        assert_eq!(silikon.completed, silikon.total);
        assert_eq!(silikon.percent, 100.0);
        assert_eq!(silikon.tier, ProgressTier::Success);
        assert_eq!(silikon.tier.color_var(), "var(--color-success)");
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ProgressTier::from_counts(0, 10), ProgressTier::Error);
        assert_eq!(ProgressTier::from_counts(1, 10), ProgressTier::Warning);
        assert_eq!(ProgressTier::from_counts(9, 10), ProgressTier::Warning);
        assert_eq!(ProgressTier::from_counts(10, 10), ProgressTier::Success);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
