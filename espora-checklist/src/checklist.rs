//! Checklist derivation engine.
//!
//! ```text
//! selectedItems ─┐
//!                ├── generate() ──→ ordered items ── apply_completion(completedItems)
//! formData ──────┘
//! ```
//!
//! Ordering is by the fixed section table first, then by item id.

use espora_core::{CatalogEntry, ChecklistItem, ItemId, Section, SectionId};
use std::collections::{BTreeMap, HashSet};

/// `selectedItems`: which catalog entries the configuration form selected.
pub type Selection = BTreeMap<ItemId, bool>;

/// `formData`: candidate entries grouped by section id.
pub type Catalog = BTreeMap<SectionId, Vec<CatalogEntry>>;

/// `completedItems`: persisted completion flags.
pub type CompletionMap = BTreeMap<ItemId, bool>;

/// Build the ordered checklist from the selection and the catalog.
///
/// Every entry selected with `true` becomes an incomplete item. A missing
/// selection or catalog yields an empty checklist. If an id appears in more
/// than one section, the occurrence in the higher-priority section wins.
pub fn generate(selected: Option<&Selection>, catalog: Option<&Catalog>) -> Vec<ChecklistItem> {
    let (Some(selected), Some(catalog)) = (selected, catalog) else {
        return Vec::new();
    };

    let mut items: Vec<ChecklistItem> = catalog
        .iter()
        .flat_map(move |(section_id, entries)| {
            entries
                .iter()
                .filter(move |entry| selected.get(&entry.id).copied().unwrap_or(false))
                .map(move |entry| ChecklistItem {
                    id: entry.id.clone(),
                    concept: entry.concept.clone(),
                    section: Section::title_for(section_id),
                    section_id: section_id.clone(),
                    completed: false,
                })
        })
        .collect();

    items.sort_by(|a, b| {
        Section::rank(a.section_id.as_str())
            .cmp(&Section::rank(b.section_id.as_str()))
            .then_with(|| a.section_id.cmp(&b.section_id))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.id.clone()));
    items
}

/// Overlay persisted completion flags onto freshly generated items.
pub fn apply_completion(items: &mut [ChecklistItem], completed: &CompletionMap) {
    for item in items.iter_mut() {
        item.completed = completed.get(&item.id).copied().unwrap_or(false);
    }
}

/// Items of one section, in checklist order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup<'a> {
    pub section_id: &'a SectionId,
    pub title: &'a str,
    pub items: Vec<&'a ChecklistItem>,
}

/// Group an ordered checklist by section, keeping section order.
pub fn group_by_section(items: &[ChecklistItem]) -> Vec<SectionGroup<'_>> {
    let mut groups: Vec<SectionGroup<'_>> = Vec::new();
    for item in items {
        match groups.last_mut() {
            Some(group) if group.section_id == &item.section_id => group.items.push(item),
            _ => groups.push(SectionGroup {
                section_id: &item.section_id,
                title: &item.section,
                items: vec![item],
            }),
        }
    }
    groups
}

/// Completion progress of a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(items: &[ChecklistItem]) -> Self {
        Self {
            completed: items.iter().filter(|i| i.completed).count(),
            total: items.len(),
        }
    }

    /// Completed share in `[0.0, 100.0]`; an empty checklist is at 0.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}
