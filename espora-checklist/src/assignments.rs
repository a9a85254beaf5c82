//! In-memory task assignment list.
//!
//! Holds at most one record per item id. Every operation that would add a
//! second record for an item updates the existing one instead.

use espora_core::{ChecklistItem, ItemId, TaskAssignment, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentList {
    records: Vec<TaskAssignment>,
}

impl AssignmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted records, folding duplicates so the last record
    /// for an item wins while keeping the position of the first.
    pub fn from_records(records: Vec<TaskAssignment>) -> Self {
        let mut list = Self::new();
        for record in records {
            match list.position(&record.item_id) {
                Some(idx) => list.records[idx] = record,
                None => list.records.push(record),
            }
        }
        list
    }

    fn position(&self, item_id: &ItemId) -> Option<usize> {
        self.records.iter().position(|r| &r.item_id == item_id)
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&TaskAssignment> {
        self.records.iter().find(|r| &r.item_id == item_id)
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.position(item_id).is_some()
    }

    /// Point the record for `item` at `user_id`, creating it if needed.
    ///
    /// A new record takes its due date from `due_date`; an existing record
    /// keeps its own due date. Both refresh the copied item fields.
    pub fn upsert(&mut self, item: &ChecklistItem, user_id: UserId, due_date: &str) {
        match self.position(&item.id) {
            Some(idx) => {
                let record = &mut self.records[idx];
                record.user_id = user_id;
                record.refresh_from(item);
            }
            None => self
                .records
                .push(TaskAssignment::from_item(item, user_id, due_date)),
        }
    }

    /// Set the due date of an existing record. Returns whether one existed.
    pub fn set_due_date(&mut self, item_id: &ItemId, due_date: &str) -> bool {
        match self.position(item_id) {
            Some(idx) => {
                self.records[idx].due_date = due_date.to_string();
                true
            }
            None => false,
        }
    }

    /// Mirror the completion flag of `item` onto its record. Returns whether
    /// one existed.
    pub fn sync_completion(&mut self, item: &ChecklistItem) -> bool {
        match self.position(&item.id) {
            Some(idx) => {
                self.records[idx].completed = item.completed;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, item_id: &ItemId) -> Option<TaskAssignment> {
        self.position(item_id).map(|idx| self.records.remove(idx))
    }

    /// Re-copy item fields onto every record and drop records whose item is
    /// gone. Returns `(refreshed, dropped)`.
    pub fn reconcile(&mut self, items: &[ChecklistItem]) -> (usize, usize) {
        let before = self.records.len();
        let mut refreshed = 0;
        self.records.retain_mut(|record| {
            match items.iter().find(|item| item.id == record.item_id) {
                Some(item) => {
                    let previous = record.clone();
                    record.refresh_from(item);
                    if *record != previous {
                        refreshed += 1;
                    }
                    true
                }
                None => false,
            }
        });
        (refreshed, before - self.records.len())
    }

    pub fn records(&self) -> &[TaskAssignment] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TaskAssignment> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espora_core::SectionId;

    fn item(id: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            id: ItemId::from(id),
            concept: format!("concept {}", id),
            section: "Set Up Estrategia Digital".to_string(),
            section_id: SectionId::from("estrategia"),
            completed,
        }
    }

    #[test]
    fn test_upsert_keeps_single_record() {
        let mut list = AssignmentList::new();
        list.upsert(&item("A1", false), UserId::from("U1"), "2025-01-10");
        list.upsert(&item("A1", false), UserId::from("U2"), "2030-01-01");
        assert_eq!(list.len(), 1);
        let record = list.get(&ItemId::from("A1")).unwrap();
        assert_eq!(record.user_id.as_str(), "U2");
        assert_eq!(record.due_date, "2025-01-10");
    }

    #[test]
    fn test_upsert_refreshes_copied_fields() {
        let mut list = AssignmentList::new();
        list.upsert(&item("A1", false), UserId::from("U1"), "");
        let mut edited = item("A1", true);
        edited.concept = "renamed".to_string();
        list.upsert(&edited, UserId::from("U1"), "");
        let record = list.get(&edited.id).unwrap();
        assert_eq!(record.concept, "renamed");
        assert!(record.completed);
    }

    #[test]
    fn test_due_date_and_completion_only_touch_existing() {
        let mut list = AssignmentList::new();
        assert!(!list.set_due_date(&ItemId::from("A1"), "2025-01-01"));
        assert!(!list.sync_completion(&item("A1", true)));
        assert!(list.is_empty());

        list.upsert(&item("A1", false), UserId::from("U1"), "");
        assert!(list.set_due_date(&ItemId::from("A1"), "2025-01-01"));
        assert!(list.sync_completion(&item("A1", true)));
        let record = list.get(&ItemId::from("A1")).unwrap();
        assert_eq!(record.due_date, "2025-01-01");
        assert!(record.completed);
    }

    #[test]
    fn test_from_records_folds_duplicates() {
        let a = TaskAssignment::from_item(&item("A1", false), UserId::from("U1"), "");
        let b = TaskAssignment::from_item(&item("B1", false), UserId::from("U1"), "");
        let a2 = TaskAssignment::from_item(&item("A1", true), UserId::from("U2"), "");
        let list = AssignmentList::from_records(vec![a, b, a2]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.records()[0].user_id.as_str(), "U2");
        assert_eq!(list.records()[1].item_id.as_str(), "B1");
    }

    #[test]
    fn test_reconcile_refreshes_and_drops() {
        let mut list = AssignmentList::new();
        list.upsert(&item("A1", false), UserId::from("U1"), "");
        list.upsert(&item("B1", false), UserId::from("U1"), "");
        let mut a1 = item("A1", true);
        a1.concept = "new text".to_string();
        let (refreshed, dropped) = list.reconcile(&[a1]);
        assert_eq!((refreshed, dropped), (1, 1));
        assert_eq!(list.records()[0].concept, "new text");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut list = AssignmentList::new();
        list.upsert(&item("A1", false), UserId::from("U9"), "");
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["itemId"], "A1");
    }
}
