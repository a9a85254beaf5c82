//! Checklist session: the single owner of checklist state.
//!
//! A session is opened once over a [`LocalStore`] and an [`Authorizer`]. It
//! reads every key up front and writes each key back in full whenever a
//! mutation changes it. Mutations take `&mut self` and run to completion, so
//! no caller can observe a half-applied change through the session.
//!
//! Every mutator checks its permission first. A denied call changes nothing,
//! writes nothing and returns [`MutationOutcome::Denied`]. Store write
//! failures are logged and counted in [`SyncStats`]; they never fail the
//! mutation.

use crate::access::Authorizer;
use crate::assignments::AssignmentList;
use crate::checklist::{
    apply_completion, generate, group_by_section, Catalog, CompletionMap, Progress, SectionGroup,
    Selection,
};
use crate::due::TaskBoard;
use crate::fields::FieldValueStore;
use chrono::NaiveDate;
use espora_core::{
    ChecklistItem, Fingerprint, ItemId, KnownField, MutationOutcome, Permission, TaskAssignment,
    UserId,
};
use espora_storage::{LocalStore, StorageKey};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Counters describing how the session's writes went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Successful key writes.
    pub writes: u64,
    /// Key writes the store rejected.
    pub write_failures: u64,
    /// Assignment writes that replaced a list written by someone else.
    pub conflicts: u64,
    /// Mutations refused by the authorizer.
    pub denied: u64,
}

pub struct ChecklistSession {
    store: LocalStore,
    authorizer: Arc<dyn Authorizer>,
    items: Vec<ChecklistItem>,
    completion: CompletionMap,
    fields: FieldValueStore,
    due_dates: BTreeMap<ItemId, String>,
    assignments: AssignmentList,
    /// Fingerprint of the assignment list as last read or written here.
    assignments_seen: Option<Fingerprint>,
    stats: SyncStats,
}

impl std::fmt::Debug for ChecklistSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistSession")
            .field("items", &self.items.len())
            .field("assignments", &self.assignments.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ChecklistSession {
    /// Open a session, loading every persisted key.
    pub fn open(store: LocalStore, authorizer: Arc<dyn Authorizer>) -> Self {
        let fields = FieldValueStore::load(store.clone());
        let due_dates = store.load(StorageKey::DueDates);
        let snapshot = store.load_snapshot::<Vec<TaskAssignment>>(StorageKey::TaskAssignments);
        let assignments_seen = snapshot.fingerprint();
        let assignments = AssignmentList::from_records(snapshot.into_value());

        let mut session = Self {
            store,
            authorizer,
            items: Vec::new(),
            completion: CompletionMap::new(),
            fields,
            due_dates,
            assignments,
            assignments_seen,
            stats: SyncStats::default(),
        };
        session.regenerate();
        tracing::debug!(
            items = session.items.len(),
            assignments = session.assignments.len(),
            "Checklist session opened"
        );
        session
    }

    /// Rebuild the checklist from `selectedItems`, `formData` and
    /// `completedItems`. Returns the number of items.
    pub fn regenerate(&mut self) -> usize {
        let selected = self.store.load_snapshot::<Selection>(StorageKey::SelectedItems);
        let catalog = self.store.load_snapshot::<Catalog>(StorageKey::FormData);
        let selected = (!selected.is_absent()).then(|| selected.into_value());
        let catalog = (!catalog.is_absent()).then(|| catalog.into_value());

        self.completion = self.store.load(StorageKey::CompletedItems);
        self.items = generate(selected.as_ref(), catalog.as_ref());
        apply_completion(&mut self.items, &self.completion);
        self.mirror_completion();
        self.items.len()
    }

    // === Reads ===

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    pub fn grouped(&self) -> Vec<SectionGroup<'_>> {
        group_by_section(&self.items)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.items)
    }

    pub fn assignments(&self) -> &[TaskAssignment] {
        self.assignments.records()
    }

    pub fn assignment(&self, item_id: &ItemId) -> Option<&TaskAssignment> {
        self.assignments.get(item_id)
    }

    /// Assignments categorized against `reference`.
    pub fn board(&self, reference: NaiveDate) -> TaskBoard<'_> {
        TaskBoard::new(self.assignments.records(), reference)
    }

    pub fn field_value(&self, item_id: &ItemId, field_name: &str) -> String {
        self.fields.get(item_id, field_name)
    }

    pub fn fields(&self) -> &FieldValueStore {
        &self.fields
    }

    /// Due date recorded for an item, or the empty string.
    pub fn due_date(&self, item_id: &ItemId) -> &str {
        self.due_dates.get(item_id).map(String::as_str).unwrap_or("")
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    // === Mutations ===

    /// Flip an item's completion and mirror it onto its assignment.
    ///
    /// An item with an assigned user but no assignment record gets one.
    pub fn toggle_completion(&mut self, item_id: &ItemId) -> MutationOutcome {
        if !self.permit(Permission::EditChecklist, "toggle_completion", item_id) {
            return MutationOutcome::Denied;
        }
        let Some(idx) = self.index_of(item_id) else {
            return MutationOutcome::NotFound;
        };

        let item = &mut self.items[idx];
        item.completed = !item.completed;
        let item = &self.items[idx];
        self.completion.insert(item.id.clone(), item.completed);

        if !self.assignments.sync_completion(item) {
            let assigned = self.fields.get_known(&item.id, KnownField::AssignedUser);
            if !assigned.is_empty() {
                let due = self.due_dates.get(&item.id).cloned().unwrap_or_default();
                self.assignments.upsert(item, UserId::from(assigned), &due);
            }
        }
        tracing::debug!(item_id = %item_id, completed = item.completed, "Toggled completion");

        self.write(StorageKey::CompletedItems);
        self.write_assignments();
        MutationOutcome::Applied
    }

    /// Assign an item to a user, creating or retargeting its record.
    ///
    /// An empty `user_id` clears the assignment.
    pub fn assign(&mut self, item_id: &ItemId, user_id: &UserId) -> MutationOutcome {
        if !self.permit(Permission::AssignTasks, "assign", item_id) {
            return MutationOutcome::Denied;
        }
        let Some(idx) = self.index_of(item_id) else {
            return MutationOutcome::NotFound;
        };
        let item = &self.items[idx];

        if user_id.is_empty() {
            self.assignments.remove(item_id);
            self.fields.insert(item_id, KnownField::AssignedUser.name(), "");
            tracing::debug!(item_id = %item_id, "Cleared assignment");
        } else {
            let due = self.due_dates.get(item_id).cloned().unwrap_or_default();
            self.assignments.upsert(item, user_id.clone(), &due);
            self.fields
                .insert(item_id, KnownField::AssignedUser.name(), user_id.as_str());
            tracing::debug!(item_id = %item_id, user_id = %user_id, "Assigned item");
        }

        self.write(StorageKey::FieldValues);
        self.write_assignments();
        MutationOutcome::Applied
    }

    /// Record an item's due date and copy it onto its assignment.
    ///
    /// An empty date removes the due date.
    pub fn set_due_date(&mut self, item_id: &ItemId, date: &str) -> MutationOutcome {
        if !self.permit(Permission::AssignTasks, "set_due_date", item_id) {
            return MutationOutcome::Denied;
        }
        let Some(idx) = self.index_of(item_id) else {
            return MutationOutcome::NotFound;
        };

        let date = date.trim();
        if date.is_empty() {
            self.due_dates.remove(item_id);
        } else {
            self.due_dates.insert(item_id.clone(), date.to_string());
        }
        if self.assignments.set_due_date(item_id, date) {
            self.assignments.sync_completion(&self.items[idx]);
        }
        tracing::debug!(item_id = %item_id, due_date = date, "Set due date");

        self.write(StorageKey::DueDates);
        self.write_assignments();
        MutationOutcome::Applied
    }

    /// Store an arbitrary field value for an item.
    ///
    /// The `assignedUser` field is owned by [`assign`](Self::assign) and is
    /// written through it, so it needs the assignment permission.
    pub fn set_field(&mut self, item_id: &ItemId, field_name: &str, value: &str) -> MutationOutcome {
        if field_name == KnownField::AssignedUser.name() {
            return self.assign(item_id, &UserId::from(value.trim()));
        }
        if !self.permit(Permission::EditChecklist, "set_field", item_id) {
            return MutationOutcome::Denied;
        }
        if self.index_of(item_id).is_none() {
            return MutationOutcome::NotFound;
        }
        self.fields.insert(item_id, field_name, value);
        tracing::debug!(item_id = %item_id, field_name, "Set field value");
        self.write(StorageKey::FieldValues);
        MutationOutcome::Applied
    }

    /// Delete an item with its assignment, field values, due date,
    /// completion flag and selection.
    ///
    /// All in-memory removals happen before the first write. The assignment
    /// list is written first so a concurrent reader never sees an
    /// assignment for an item whose fields are already gone.
    pub fn delete_item(&mut self, item_id: &ItemId) -> MutationOutcome {
        if !self.permit(Permission::EditChecklist, "delete_item", item_id) {
            return MutationOutcome::Denied;
        }
        let Some(idx) = self.index_of(item_id) else {
            return MutationOutcome::NotFound;
        };

        self.items.remove(idx);
        self.assignments.remove(item_id);
        let swept = self.fields.sweep_item(item_id);
        self.due_dates.remove(item_id);
        self.completion.remove(item_id);
        let mut selected: Selection = self.store.load(StorageKey::SelectedItems);
        selected.remove(item_id);
        tracing::debug!(item_id = %item_id, fields_removed = swept, "Deleted item");

        self.write_assignments();
        self.write(StorageKey::FieldValues);
        self.write(StorageKey::DueDates);
        self.write(StorageKey::CompletedItems);
        save_logged(&self.store, &mut self.stats, StorageKey::SelectedItems, &selected);
        MutationOutcome::Applied
    }

    /// Re-copy item fields onto every assignment and drop assignments whose
    /// item no longer exists.
    pub fn reconcile(&mut self) -> MutationOutcome {
        if !self.authorizer.allows(Permission::EditChecklist) {
            self.stats.denied += 1;
            tracing::warn!(action = "reconcile", "Permission denied");
            return MutationOutcome::Denied;
        }
        let (refreshed, dropped) = self.assignments.reconcile(&self.items);
        tracing::debug!(refreshed, dropped, "Reconciled assignments");
        self.write_assignments();
        MutationOutcome::Applied
    }

    /// Re-read the persisted assignment list if someone else changed it.
    ///
    /// The persisted list replaces the in-memory one wholesale. Returns
    /// whether anything was replaced.
    pub fn reload_assignments(&mut self) -> bool {
        let current = self.store.fingerprint(StorageKey::TaskAssignments);
        if current == self.assignments_seen {
            return false;
        }
        let snapshot = self
            .store
            .load_snapshot::<Vec<TaskAssignment>>(StorageKey::TaskAssignments);
        self.assignments_seen = snapshot.fingerprint();
        self.assignments = AssignmentList::from_records(snapshot.into_value());
        self.mirror_completion();
        tracing::debug!(assignments = self.assignments.len(), "Reloaded assignments");
        true
    }

    // === Internals ===

    /// Copy every item's completion onto its assignment record.
    fn mirror_completion(&mut self) {
        for item in &self.items {
            self.assignments.sync_completion(item);
        }
    }

    fn index_of(&self, item_id: &ItemId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == item_id)
    }

    fn permit(&mut self, permission: Permission, action: &'static str, item_id: &ItemId) -> bool {
        if self.authorizer.allows(permission) {
            return true;
        }
        self.stats.denied += 1;
        tracing::warn!(action, item_id = %item_id, permission = %permission, "Permission denied");
        false
    }

    fn write(&mut self, key: StorageKey) {
        match key {
            StorageKey::CompletedItems => {
                save_logged(&self.store, &mut self.stats, key, &self.completion);
            }
            StorageKey::DueDates => {
                save_logged(&self.store, &mut self.stats, key, &self.due_dates);
            }
            StorageKey::FieldValues => {
                save_logged(&self.store, &mut self.stats, key, self.fields.as_map());
            }
            StorageKey::TaskAssignments => self.write_assignments(),
            StorageKey::SelectedItems | StorageKey::FormData => {
                tracing::error!(key = %key, "Session does not own this key");
            }
        }
    }

    fn write_assignments(&mut self) {
        let key = StorageKey::TaskAssignments;
        let current = self.store.fingerprint(key);
        if current != self.assignments_seen {
            self.stats.conflicts += 1;
            tracing::warn!(
                key = %key,
                "Assignment list changed by another writer since last read, overwriting"
            );
        }
        if let Some(fp) = save_logged(&self.store, &mut self.stats, key, &self.assignments) {
            self.assignments_seen = Some(fp);
        }
    }
}

fn save_logged<T>(
    store: &LocalStore,
    stats: &mut SyncStats,
    key: StorageKey,
    value: &T,
) -> Option<Fingerprint>
where
    T: Serialize + ?Sized,
{
    match store.save(key, value) {
        Ok(fp) => {
            stats.writes += 1;
            Some(fp)
        }
        Err(err) => {
            stats.write_failures += 1;
            tracing::error!(key = %key, error = %err, "Failed to persist state");
            None
        }
    }
}
