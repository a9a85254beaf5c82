//! Enum types for checklist state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing an enum from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// ACCESS CONTROL
// ============================================================================

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operador,
    Capturista,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operador => "operador",
            Role::Capturista => "capturista",
        }
    }

    /// Whether this role holds `permission`.
    pub fn grants(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::Operador => matches!(
                permission,
                Permission::EditChecklist | Permission::AssignTasks | Permission::EditPresentacion
            ),
            Role::Capturista => matches!(permission, Permission::EditChecklist),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operador" => Ok(Role::Operador),
            "capturista" => Ok(Role::Capturista),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// Action guarded by the access-control gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    EditChecklist,
    AssignTasks,
    CreateAccounts,
    EditAccounts,
    EditPresentacion,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::EditChecklist,
        Permission::AssignTasks,
        Permission::CreateAccounts,
        Permission::EditAccounts,
        Permission::EditPresentacion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::EditChecklist => "edit_checklist",
            Permission::AssignTasks => "assign_tasks",
            Permission::CreateAccounts => "create_accounts",
            Permission::EditAccounts => "edit_accounts",
            Permission::EditPresentacion => "edit_presentacion",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| ParseEnumError::new("permission", s))
    }
}

/// Result of a gated mutation.
///
/// Mutations never fail loudly: a denied or unknown target leaves state
/// untouched and the caller decides how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Denied,
    NotFound,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, MutationOutcome::Denied)
    }
}

// ============================================================================
// DUE DATES
// ============================================================================

/// Time bucket of an assignment relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueCategory {
    Past,
    Today,
    ThisWeek,
    NextWeek,
    Later,
    NoDate,
}

impl DueCategory {
    pub const ALL: [DueCategory; 6] = [
        DueCategory::Past,
        DueCategory::Today,
        DueCategory::ThisWeek,
        DueCategory::NextWeek,
        DueCategory::Later,
        DueCategory::NoDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DueCategory::Past => "past",
            DueCategory::Today => "today",
            DueCategory::ThisWeek => "this-week",
            DueCategory::NextWeek => "next-week",
            DueCategory::Later => "later",
            DueCategory::NoDate => "no-date",
        }
    }
}

impl fmt::Display for DueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DueCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        DueCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("due category", s))
    }
}

/// Dashboard filter: a single category or the `all` pseudo-category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DueFilter {
    #[default]
    All,
    Only(DueCategory),
}

impl DueFilter {
    pub fn matches(&self, category: DueCategory) -> bool {
        match self {
            DueFilter::All => true,
            DueFilter::Only(expected) => *expected == category,
        }
    }
}

impl fmt::Display for DueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueFilter::All => f.write_str("all"),
            DueFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for DueFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DueFilter::All);
        }
        s.parse::<DueCategory>()
            .map(DueFilter::Only)
            .map_err(|_| ParseEnumError::new("due filter", s))
    }
}

// ============================================================================
// FIELD CATALOG
// ============================================================================

/// How an editor should interpret a field's string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
}

/// Per-item fields with a known meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownField {
    /// Id of the user the item is assigned to.
    AssignedUser,
    Kpi,
    Cost,
}

impl KnownField {
    pub const ALL: [KnownField; 3] = [KnownField::AssignedUser, KnownField::Kpi, KnownField::Cost];

    /// Field name used in the composite storage key.
    pub fn name(&self) -> &'static str {
        match self {
            KnownField::AssignedUser => "assignedUser",
            KnownField::Kpi => "kpi",
            KnownField::Cost => "cost",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            KnownField::AssignedUser => FieldKind::Select,
            KnownField::Kpi => FieldKind::Text,
            KnownField::Cost => FieldKind::Number,
        }
    }
}

impl fmt::Display for KnownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownField::ALL
            .into_iter()
            .find(|f| f.name() == s.trim())
            .ok_or_else(|| ParseEnumError::new("field", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_grants() {
        for permission in Permission::ALL {
            assert!(Role::Admin.grants(permission));
        }
        assert!(Role::Operador.grants(Permission::AssignTasks));
        assert!(!Role::Operador.grants(Permission::CreateAccounts));
        assert!(Role::Capturista.grants(Permission::EditChecklist));
        assert!(!Role::Capturista.grants(Permission::AssignTasks));
    }

    #[test]
    fn test_permission_round_trips_through_str() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
        }
        assert!("delete_everything".parse::<Permission>().is_err());
    }

    #[test]
    fn test_due_filter_parsing() {
        assert_eq!("all".parse::<DueFilter>(), Ok(DueFilter::All));
        assert_eq!(
            "this_week".parse::<DueFilter>(),
            Ok(DueFilter::Only(DueCategory::ThisWeek))
        );
        assert_eq!(
            "No-Date".parse::<DueFilter>(),
            Ok(DueFilter::Only(DueCategory::NoDate))
        );
        let err = "tomorrow".parse::<DueFilter>().unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }

    #[test]
    fn test_due_filter_matches() {
        assert!(DueFilter::All.matches(DueCategory::Later));
        assert!(DueFilter::Only(DueCategory::Today).matches(DueCategory::Today));
        assert!(!DueFilter::Only(DueCategory::Today).matches(DueCategory::Past));
    }

    #[test]
    fn test_due_category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&DueCategory::NextWeek).unwrap(),
            "\"next-week\""
        );
    }

    #[test]
    fn test_known_field_names() {
        assert_eq!(KnownField::AssignedUser.name(), "assignedUser");
        assert_eq!("cost".parse::<KnownField>(), Ok(KnownField::Cost));
        assert_eq!(KnownField::Cost.kind(), FieldKind::Number);
    }
}
