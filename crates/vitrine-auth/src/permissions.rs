//! Role/permission resolution with a TTL cache
//!
//! Permission definitions change rarely, so the role-to-bitset mapping
//! is memoized per process. Entries are evicted lazily on access; a
//! concurrent recompute race resolves last-writer-wins, which is
//! acceptable because permission data is idempotent per role.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AuthError;

/// Capability bits carried by a role's permission mask.
pub mod permission {
    pub const VIEW_PROJECTS: i64 = 1 << 0;
    pub const EDIT_PROJECTS: i64 = 1 << 1;
    pub const DELETE_PROJECTS: i64 = 1 << 2;
    pub const VIEW_PROFILE: i64 = 1 << 3;
    pub const EDIT_PROFILE: i64 = 1 << 4;
    pub const MANAGE_USERS: i64 = 1 << 5;

    pub const ALL: i64 = VIEW_PROJECTS
        | EDIT_PROJECTS
        | DELETE_PROJECTS
        | VIEW_PROFILE
        | EDIT_PROFILE
        | MANAGE_USERS;
}

/// A role's named capability bitset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    pub role_id: i64,
    pub name: String,
    pub bits: i64,
}

impl PermissionSet {
    /// Deny-all set for roles the directory does not know.
    pub fn empty(role_id: i64) -> Self {
        Self {
            role_id,
            name: "unknown".to_string(),
            bits: 0,
        }
    }

    pub fn allows(&self, bit: i64) -> bool {
        self.bits & bit == bit
    }
}

/// Backing lookup for role permissions.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn permissions_for_role(&self, role_id: i64) -> Result<Option<PermissionSet>, AuthError>;
}

pub const DEFAULT_PERMISSION_TTL_SECS: i64 = 86_400;

struct CachedEntry {
    permissions: PermissionSet,
    expires_at: DateTime<Utc>,
}

/// Memoized role-to-permission mapping.
pub struct PermissionCache {
    directory: Arc<dyn RoleDirectory>,
    ttl: Duration,
    entries: RwLock<HashMap<i64, CachedEntry>>,
}

impl PermissionCache {
    pub fn new(directory: Arc<dyn RoleDirectory>, ttl: Duration) -> Self {
        Self {
            directory,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the permission set for `role_id`, judging staleness at
    /// `now`. A miss costs exactly one backing lookup; lookup failures
    /// resolve deny-all and are not cached, so the next check retries.
    pub async fn get_at(&self, role_id: i64, now: DateTime<Utc>) -> PermissionSet {
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(&role_id)
                && now < entry.expires_at
            {
                return entry.permissions.clone();
            }
        }

        // Stale entries are dropped here rather than by a sweeper. The
        // re-check under the write lock avoids discarding an entry a
        // concurrent request just refreshed.
        {
            let mut entries = self.entries.write();
            if let Some(entry) = entries.get(&role_id) {
                if now < entry.expires_at {
                    return entry.permissions.clone();
                }
                entries.remove(&role_id);
            }
        }

        let resolved = match self.directory.permissions_for_role(role_id).await {
            Ok(Some(set)) => set,
            Ok(None) => {
                debug!(role_id, "Unknown role, caching deny-all permissions");
                PermissionSet::empty(role_id)
            }
            Err(err) => {
                warn!(role_id, "Role lookup failed: {}", err);
                return PermissionSet::empty(role_id);
            }
        };

        let mut entries = self.entries.write();
        entries.insert(
            role_id,
            CachedEntry {
                permissions: resolved.clone(),
                expires_at: now + self.ttl,
            },
        );
        resolved
    }

    pub async fn get(&self, role_id: i64) -> PermissionSet {
        self.get_at(role_id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDirectory {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingDirectory {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: false })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: true })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoleDirectory for CountingDirectory {
        async fn permissions_for_role(
            &self,
            role_id: i64,
        ) -> Result<Option<PermissionSet>, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AuthError::Directory("backing store down".to_string()));
            }
            match role_id {
                1 => Ok(Some(PermissionSet {
                    role_id: 1,
                    name: "Admin".to_string(),
                    bits: permission::ALL,
                })),
                _ => Ok(None),
            }
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_recompute() {
        let directory = CountingDirectory::new();
        let cache = PermissionCache::new(directory.clone(), Duration::seconds(86_400));

        let first = cache.get_at(1, at(0)).await;
        let second = cache.get_at(1, at(3_600)).await;

        assert_eq!(first, second);
        assert!(first.allows(permission::EDIT_PROJECTS));
        assert_eq!(directory.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputes() {
        let directory = CountingDirectory::new();
        let cache = PermissionCache::new(directory.clone(), Duration::seconds(86_400));

        cache.get_at(1, at(0)).await;
        cache.get_at(1, at(86_401)).await;

        assert_eq!(directory.calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_role_is_deny_all_and_cached() {
        let directory = CountingDirectory::new();
        let cache = PermissionCache::new(directory.clone(), Duration::seconds(86_400));

        let set = cache.get_at(99, at(0)).await;
        cache.get_at(99, at(1)).await;

        assert_eq!(set.bits, 0);
        assert!(!set.allows(permission::VIEW_PROJECTS));
        assert_eq!(directory.calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_cached() {
        let directory = CountingDirectory::failing();
        let cache = PermissionCache::new(directory.clone(), Duration::seconds(86_400));

        let set = cache.get_at(1, at(0)).await;
        cache.get_at(1, at(1)).await;

        assert_eq!(set.bits, 0);
        assert_eq!(directory.calls(), 2);
    }

    #[test]
    fn test_allows_requires_every_bit() {
        let set = PermissionSet {
            role_id: 2,
            name: "Editor".to_string(),
            bits: permission::VIEW_PROJECTS | permission::EDIT_PROJECTS,
        };

        assert!(set.allows(permission::VIEW_PROJECTS));
        assert!(set.allows(permission::VIEW_PROJECTS | permission::EDIT_PROJECTS));
        assert!(!set.allows(permission::DELETE_PROJECTS));
        assert!(!set.allows(permission::VIEW_PROJECTS | permission::DELETE_PROJECTS));
    }
}
