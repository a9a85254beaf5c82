//! Checklist entities and their persisted shapes.

use crate::{ItemId, Role, SectionId, UserId};
use serde::{Deserialize, Serialize};

/// Candidate item as written by the upstream configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    #[serde(default)]
    pub concept: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<ItemId>, concept: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            concept: concept.into(),
        }
    }
}

/// A unit of work derived from a selected catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ItemId,
    pub concept: String,
    /// Display title of the section.
    pub section: String,
    pub section_id: SectionId,
    pub completed: bool,
}

/// Denormalized record binding a checklist item to a user.
///
/// `concept`, `section` and `section_id` are copies taken from the item the
/// last time the record was written; they are not linked to the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    pub item_id: ItemId,
    pub user_id: UserId,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub section_id: SectionId,
    /// ISO date (`YYYY-MM-DD`) or empty.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskAssignment {
    /// Build a record capturing the current state of `item`.
    pub fn from_item(item: &ChecklistItem, user_id: UserId, due_date: impl Into<String>) -> Self {
        Self {
            item_id: item.id.clone(),
            user_id,
            concept: item.concept.clone(),
            section: item.section.clone(),
            section_id: item.section_id.clone(),
            due_date: due_date.into(),
            completed: item.completed,
        }
    }

    /// Re-copy the denormalized fields and completion flag from `item`.
    pub fn refresh_from(&mut self, item: &ChecklistItem) {
        self.concept = item.concept.clone();
        self.section = item.section.clone();
        self.section_id = item.section_id.clone();
        self.completed = item.completed;
    }

    pub fn has_due_date(&self) -> bool {
        !self.due_date.trim().is_empty()
    }
}

/// Directory entry for a user who can receive assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ChecklistItem {
        ChecklistItem {
            id: ItemId::from("A1"),
            concept: "Do X".to_string(),
            section: "Set Up Estrategia Digital".to_string(),
            section_id: SectionId::from("estrategia"),
            completed: true,
        }
    }

    #[test]
    fn test_assignment_uses_camel_case_keys() {
        let assignment = TaskAssignment::from_item(&item(), UserId::from("U9"), "2025-01-02");
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["itemId"], "A1");
        assert_eq!(json["userId"], "U9");
        assert_eq!(json["sectionId"], "estrategia");
        assert_eq!(json["dueDate"], "2025-01-02");
        assert_eq!(json["completed"], true);
    }

    #[test]
    fn test_assignment_tolerates_missing_optional_fields() {
        let parsed: TaskAssignment =
            serde_json::from_str(r#"{"itemId":"A1","userId":"U9"}"#).unwrap();
        assert_eq!(parsed.due_date, "");
        assert!(!parsed.completed);
        assert!(!parsed.has_due_date());
    }

    #[test]
    fn test_refresh_from_copies_item_state() {
        let mut assignment = TaskAssignment::from_item(&item(), UserId::from("U9"), "");
        let mut edited = item();
        edited.concept = "Do Y".to_string();
        edited.completed = false;
        assignment.refresh_from(&edited);
        assert_eq!(assignment.concept, "Do Y");
        assert!(!assignment.completed);
    }

    #[test]
    fn test_catalog_entry_ignores_extra_fields() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":"A1","concept":"Do X","owner":"n/a"}"#).unwrap();
        assert_eq!(entry, CatalogEntry::new("A1", "Do X"));
    }
}
