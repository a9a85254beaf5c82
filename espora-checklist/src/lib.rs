//! ESPORA Checklist - State Management
//!
//! Derives the engagement checklist from the configuration form's
//! selections, keeps per-item field values, and keeps the denormalized task
//! assignment list consistent with both. All state is read from and written
//! to a [`espora_storage::LocalStore`]; mutations go through
//! [`ChecklistSession`], which consults an [`Authorizer`] before changing
//! anything.

pub mod access;
pub mod assignments;
pub mod checklist;
pub mod due;
pub mod fields;
pub mod refresh;
pub mod session;

pub use access::{Authorizer, RoleAuthorizer, StaticUserDirectory, UserDirectory};
pub use assignments::AssignmentList;
pub use checklist::{
    apply_completion, generate, group_by_section, Catalog, CompletionMap, Progress, Selection,
    SectionGroup,
};
pub use due::{
    classify, classify_date, counts, local_today, parse_due_date, CategoryCounts, TaskBoard,
    WeekWindow,
};
pub use fields::{composite_key, FieldValueStore};
pub use refresh::{spawn_refresher, AssignmentFeed, RefreshHandle, DEFAULT_REFRESH_INTERVAL};
pub use session::{ChecklistSession, SyncStats};
