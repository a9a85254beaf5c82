//! Access-control gate and user directory collaborators.
//!
//! The checklist engine never decides who may do what. It asks an
//! [`Authorizer`] and treats the answer as final.

use espora_core::{Permission, User, UserId};

/// Boolean permission predicate supplied by the host application.
pub trait Authorizer: Send + Sync {
    /// The user on whose behalf mutations are performed.
    fn current_user(&self) -> Option<User>;

    /// Whether `user` may perform `permission`.
    fn has_permission(&self, user: &User, permission: Permission) -> bool;

    /// Whether the current user may perform `permission`.
    ///
    /// No current user means no permission.
    fn allows(&self, permission: Permission) -> bool {
        self.current_user()
            .map(|user| self.has_permission(&user, permission))
            .unwrap_or(false)
    }
}

/// Authorizer deriving permissions from the user's role.
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizer {
    current: Option<User>,
}

impl RoleAuthorizer {
    pub fn new(current: Option<User>) -> Self {
        Self { current }
    }

    pub fn for_user(user: User) -> Self {
        Self {
            current: Some(user),
        }
    }

    /// Authorizer with nobody signed in.
    pub fn anonymous() -> Self {
        Self { current: None }
    }
}

impl Authorizer for RoleAuthorizer {
    fn current_user(&self) -> Option<User> {
        self.current.clone()
    }

    fn has_permission(&self, user: &User, permission: Permission) -> bool {
        user.role.grants(permission)
    }
}

/// Source of users for assignment pickers.
pub trait UserDirectory: Send + Sync {
    fn list_users(&self) -> Vec<User>;

    fn find_user(&self, id: &UserId) -> Option<User> {
        self.list_users().into_iter().find(|u| &u.id == id)
    }
}

/// Fixed, in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: Vec<User>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl UserDirectory for StaticUserDirectory {
    fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espora_core::Role;

    #[test]
    fn test_anonymous_is_denied_everything() {
        let auth = RoleAuthorizer::anonymous();
        for permission in Permission::ALL {
            assert!(!auth.allows(permission));
        }
    }

    #[test]
    fn test_role_authorizer_follows_role_grants() {
        let auth = RoleAuthorizer::for_user(User::new("u1", "Cap", Role::Capturista));
        assert!(auth.allows(Permission::EditChecklist));
        assert!(!auth.allows(Permission::AssignTasks));

        let admin = User::new("u2", "Admin", Role::Admin);
        assert!(auth.has_permission(&admin, Permission::AssignTasks));
    }

    #[test]
    fn test_static_directory_lookup() {
        let dir = StaticUserDirectory::new(vec![
            User::new("U1", "Ana", Role::Admin),
            User::new("U9", "Luis", Role::Operador),
        ]);
        assert_eq!(dir.list_users().len(), 2);
        assert_eq!(
            dir.find_user(&UserId::from("U9")).map(|u| u.name),
            Some("Luis".to_string())
        );
        assert!(dir.find_user(&UserId::from("U5")).is_none());
    }
}
