//! Persisted key catalog.

use std::fmt;

/// Key under which a piece of checklist state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// `{ itemId: bool }`, written by the configuration form.
    SelectedItems,
    /// `{ sectionId: CatalogEntry[] }`, written by the configuration form.
    FormData,
    /// `{ itemId: bool }`
    CompletedItems,
    /// `{ "<itemId>-<fieldName>": string }`
    FieldValues,
    /// `{ itemId: string }`
    DueDates,
    /// `TaskAssignment[]`
    TaskAssignments,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::SelectedItems,
        StorageKey::FormData,
        StorageKey::CompletedItems,
        StorageKey::FieldValues,
        StorageKey::DueDates,
        StorageKey::TaskAssignments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::SelectedItems => "selectedItems",
            StorageKey::FormData => "formData",
            StorageKey::CompletedItems => "completedItems",
            StorageKey::FieldValues => "fieldValues",
            StorageKey::DueDates => "dueDates",
            StorageKey::TaskAssignments => "taskAssignments",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
