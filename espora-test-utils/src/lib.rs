//! Espora Hub Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for ids, catalog entries, items and assignments
//! - Fixtures for seeded stores and the three staff roles
//! - Assertions for checklist-specific invariants

pub use espora_storage::{InMemoryKvStore, KvStore, LocalStore};

pub use espora_core::{
    CatalogEntry, ChecklistItem, DueCategory, ItemId, Role, Section, SectionId, TaskAssignment,
    User, UserId, SECTION_ORDER,
};

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Catalog shape persisted under `formData`.
pub type FormData = BTreeMap<SectionId, Vec<CatalogEntry>>;

/// Selection shape persisted under `selectedItems`.
pub type Selected = BTreeMap<ItemId, bool>;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for checklist data.

    use super::*;
    use proptest::prelude::*;

    // === Identity Generators ===

    /// Short item ids drawn from a small space so collisions happen.
    pub fn arb_item_id() -> impl Strategy<Value = ItemId> {
        "[A-F][0-9]{1,2}".prop_map(ItemId::from)
    }

    pub fn arb_user_id() -> impl Strategy<Value = UserId> {
        "U[0-9]{1,2}".prop_map(UserId::from)
    }

    /// A known section id, or occasionally an unknown one.
    pub fn arb_section_id() -> impl Strategy<Value = SectionId> {
        prop_oneof![
            8 => prop::sample::select(SECTION_ORDER.to_vec()).prop_map(|s| SectionId::from(s.id)),
            1 => "[a-z]{3,8}".prop_map(SectionId::from),
        ]
    }

    // === Enum Generators ===

    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Admin),
            Just(Role::Operador),
            Just(Role::Capturista),
        ]
    }

    // === Entity Generators ===

    pub fn arb_user() -> impl Strategy<Value = User> {
        (arb_user_id(), "[A-Z][a-z]{2,8}", arb_role())
            .prop_map(|(id, name, role)| User::new(id, name, role))
    }

    pub fn arb_catalog_entry() -> impl Strategy<Value = CatalogEntry> {
        (arb_item_id(), "[A-Za-z ]{0,24}").prop_map(|(id, concept)| CatalogEntry::new(id, concept))
    }

    pub fn arb_form_data() -> impl Strategy<Value = FormData> {
        prop::collection::btree_map(
            arb_section_id(),
            prop::collection::vec(arb_catalog_entry(), 0..6),
            0..6,
        )
    }

    /// A catalog together with a selection over (mostly) its own ids.
    pub fn arb_form_with_selection() -> impl Strategy<Value = (FormData, Selected)> {
        arb_form_data().prop_flat_map(|form| {
            let ids: Vec<ItemId> = form
                .values()
                .flatten()
                .map(|entry| entry.id.clone())
                .collect();
            let picks = prop::collection::vec(any::<bool>(), ids.len());
            let extra = prop::collection::btree_map(arb_item_id(), any::<bool>(), 0..3);
            (Just(form), Just(ids), picks, extra).prop_map(|(form, ids, picks, mut selected)| {
                selected.extend(ids.into_iter().zip(picks));
                (form, selected)
            })
        })
    }

    /// A calendar day between 2020 and 2030.
    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0u64..3650).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|base| base.checked_add_days(chrono::Days::new(offset)))
                .unwrap_or_default()
        })
    }

    /// A stored due date: empty, a valid ISO date, or junk.
    pub fn arb_due_date() -> impl Strategy<Value = String> {
        prop_oneof![
            2 => Just(String::new()),
            6 => arb_date().prop_map(|d| d.format("%Y-%m-%d").to_string()),
            1 => "[a-z]{1,6}",
        ]
    }

    pub fn arb_checklist_item() -> impl Strategy<Value = ChecklistItem> {
        (arb_item_id(), "[A-Za-z ]{0,24}", arb_section_id(), any::<bool>()).prop_map(
            |(id, concept, section_id, completed)| ChecklistItem {
                id,
                concept,
                section: Section::title_for(&section_id),
                section_id,
                completed,
            },
        )
    }

    pub fn arb_task_assignment() -> impl Strategy<Value = TaskAssignment> {
        (arb_checklist_item(), arb_user_id(), arb_due_date())
            .prop_map(|(item, user, due)| TaskAssignment::from_item(&item, user, due))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common scenarios.

    use super::*;

    pub fn admin() -> User {
        User::new("U1", "Admin", Role::Admin)
    }

    pub fn operador() -> User {
        User::new("U2", "Operador", Role::Operador)
    }

    pub fn capturista() -> User {
        User::new("U3", "Capturista", Role::Capturista)
    }

    /// The three staff users plus the assignee used in scenarios.
    pub fn users() -> Vec<User> {
        vec![
            admin(),
            operador(),
            capturista(),
            User::new("U9", "Valeria", Role::Operador),
        ]
    }

    /// Build `formData` from `(section, [(id, concept)])` pairs.
    pub fn form_data(sections: Vec<(&str, Vec<(&str, &str)>)>) -> FormData {
        sections
            .into_iter()
            .map(|(section, entries)| {
                (
                    SectionId::from(section),
                    entries
                        .into_iter()
                        .map(|(id, concept)| CatalogEntry::new(id, concept))
                        .collect(),
                )
            })
            .collect()
    }

    pub fn selected(ids: &[(&str, bool)]) -> Selected {
        ids.iter().map(|(id, v)| (ItemId::from(*id), *v)).collect()
    }

    /// An in-memory store holding `selectedItems` and `formData`.
    pub fn seeded_store(selected: &Selected, form: &FormData) -> Arc<InMemoryKvStore> {
        let kv = Arc::new(InMemoryKvStore::new());
        let store = LocalStore::new(kv.clone());
        store
            .save(espora_storage::StorageKey::SelectedItems, selected)
            .expect("seed selectedItems");
        store
            .save(espora_storage::StorageKey::FormData, form)
            .expect("seed formData");
        kv
    }

    /// Single item `A1` "Do X" in the strategy section, selected.
    pub fn single_item_store() -> Arc<InMemoryKvStore> {
        seeded_store(
            &selected(&[("A1", true)]),
            &form_data(vec![("estrategia", vec![("A1", "Do X")])]),
        )
    }

    /// Several items across sections; `C1` is catalogued but not selected.
    pub fn sample_store() -> Arc<InMemoryKvStore> {
        seeded_store(
            &selected(&[
                ("A1", true),
                ("A2", true),
                ("B1", true),
                ("C1", false),
                ("D1", true),
            ]),
            &form_data(vec![
                ("difusion", vec![("D1", "Publish schedule")]),
                ("estrategia", vec![("A2", "Audit channels"), ("A1", "Do X")]),
                ("contenido", vec![("B1", "Write copy"), ("C1", "Unused")]),
            ]),
        )
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for checklist invariants.

    use super::*;
    use std::collections::HashSet;

    /// Assert that no item id has more than one assignment.
    #[track_caller]
    pub fn assert_single_assignment_per_item(assignments: &[TaskAssignment]) {
        let mut seen = HashSet::new();
        for record in assignments {
            assert!(
                seen.insert(&record.item_id),
                "Duplicate assignment for item {}",
                record.item_id
            );
        }
    }

    /// Assert section priority then id ordering with unique ids.
    #[track_caller]
    pub fn assert_checklist_ordered(items: &[ChecklistItem]) {
        for pair in items.windows(2) {
            let a = (
                Section::rank(pair[0].section_id.as_str()),
                &pair[0].section_id,
                &pair[0].id,
            );
            let b = (
                Section::rank(pair[1].section_id.as_str()),
                &pair[1].section_id,
                &pair[1].id,
            );
            assert!(a < b, "Items out of order: {:?} before {:?}", pair[0].id, pair[1].id);
        }
    }

    /// Assert that every assignment points at an item in `items`.
    #[track_caller]
    pub fn assert_assignments_reference_items(
        assignments: &[TaskAssignment],
        items: &[ChecklistItem],
    ) {
        for record in assignments {
            assert!(
                items.iter().any(|i| i.id == record.item_id),
                "Assignment for missing item {}",
                record.item_id
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
