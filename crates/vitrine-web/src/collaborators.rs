//! Database-backed collaborators for the authentication gate
//!
//! The auth crate talks to the user and role tables only through these
//! narrow adapters.

use async_trait::async_trait;
use vitrine_auth::{AuthError, PermissionSet, RoleDirectory, UserIdentity, UserStore};
use vitrine_db::Database;

/// User-record lookup over the users table.
pub struct DbUserStore {
    db: Database,
}

impl DbUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DbUserStore {
    async fn get_identity(&self, user_id: i64) -> Result<Option<UserIdentity>, AuthError> {
        self.db
            .get_user_by_id(user_id)
            .await
            .map(|user| {
                user.map(|u| UserIdentity {
                    user_id: u.id,
                    acctype: u.acctype,
                })
            })
            .map_err(|e| AuthError::Store(e.to_string()))
    }
}

/// Role-to-permission lookup over the roles table.
pub struct DbRoleDirectory {
    db: Database,
}

impl DbRoleDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleDirectory for DbRoleDirectory {
    async fn permissions_for_role(&self, role_id: i64) -> Result<Option<PermissionSet>, AuthError> {
        self.db
            .get_role(role_id)
            .await
            .map(|role| {
                role.map(|r| PermissionSet {
                    role_id: r.id,
                    name: r.name,
                    bits: r.permissions,
                })
            })
            .map_err(|e| AuthError::Directory(e.to_string()))
    }
}
