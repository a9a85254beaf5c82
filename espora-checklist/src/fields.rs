//! Per-item field values.
//!
//! Values live in one flat map keyed by `"<itemId>-<fieldName>"`. Nothing is
//! coerced: numbers and select options are stored as the strings the editor
//! produced. [`KnownField`] gives typed names to the fields the engine itself
//! relies on; any other field name is accepted as dynamic metadata.

use espora_core::{ItemId, KnownField, StorageResult};
use espora_storage::{LocalStore, StorageKey};
use std::collections::BTreeMap;

/// Composite storage key of a field value.
pub fn composite_key(item_id: &ItemId, field_name: &str) -> String {
    format!("{}-{}", item_id, field_name)
}

/// Field values of every checklist item, persisted under `fieldValues`.
#[derive(Debug, Clone)]
pub struct FieldValueStore {
    values: BTreeMap<String, String>,
    store: LocalStore,
}

impl FieldValueStore {
    /// Load the persisted map; malformed data yields an empty store.
    pub fn load(store: LocalStore) -> Self {
        let values = store.load(StorageKey::FieldValues);
        Self { values, store }
    }

    /// Value of a field, or the empty string.
    pub fn get(&self, item_id: &ItemId, field_name: &str) -> String {
        self.values
            .get(&composite_key(item_id, field_name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_known(&self, item_id: &ItemId, field: KnownField) -> String {
        self.get(item_id, field.name())
    }

    /// Set a field and persist the whole map.
    pub fn set(
        &mut self,
        item_id: &ItemId,
        field_name: &str,
        value: impl Into<String>,
    ) -> StorageResult<()> {
        self.insert(item_id, field_name, value);
        self.persist()
    }

    pub fn set_known(
        &mut self,
        item_id: &ItemId,
        field: KnownField,
        value: impl Into<String>,
    ) -> StorageResult<()> {
        self.set(item_id, field.name(), value)
    }

    /// Remove every field of `item_id` and persist the reduced map.
    pub fn remove_item(&mut self, item_id: &ItemId) -> StorageResult<usize> {
        let removed = self.sweep_item(item_id);
        self.persist()?;
        Ok(removed)
    }

    /// In-memory insert without persisting.
    pub(crate) fn insert(&mut self, item_id: &ItemId, field_name: &str, value: impl Into<String>) {
        self.values
            .insert(composite_key(item_id, field_name), value.into());
    }

    /// In-memory prefix sweep without persisting; returns the number removed.
    pub(crate) fn sweep_item(&mut self, item_id: &ItemId) -> usize {
        let prefix = format!("{}-", item_id);
        let before = self.values.len();
        self.values.retain(|key, _| !key.starts_with(&prefix));
        before - self.values.len()
    }

    pub(crate) fn persist(&self) -> StorageResult<()> {
        self.store.save(StorageKey::FieldValues, &self.values).map(|_| ())
    }

    /// Whether any field is stored for `item_id`.
    pub fn has_item(&self, item_id: &ItemId) -> bool {
        let prefix = format!("{}-", item_id);
        self.values.keys().any(|key| key.starts_with(&prefix))
    }

    /// Raw composite-keyed map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
