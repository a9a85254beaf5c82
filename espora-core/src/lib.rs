//! ESPORA Core - Entity Types
//!
//! Pure data structures shared by the storage adapter, the checklist engine
//! and the command-line host. Behavior beyond parsing, ordering and
//! formatting lives in `espora-checklist`.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod section;

pub use entities::{CatalogEntry, ChecklistItem, TaskAssignment, User};
pub use enums::{
    DueCategory, DueFilter, FieldKind, KnownField, MutationOutcome, ParseEnumError, Permission,
    Role,
};
pub use error::{StorageError, StorageResult};
pub use identity::{fingerprint, Fingerprint, ItemId, SectionId, UserId};
pub use section::{Section, SECTION_ORDER};
