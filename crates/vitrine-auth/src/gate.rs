//! Request authentication gate
//!
//! Turns inbound cookies into a trusted per-request identity context
//! and keeps the access credential fresh through sliding renewal. The
//! gate never errors toward the caller: absent, corrupt, or expired
//! credentials silently degrade to the anonymous identity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error};

use crate::cookie::{CookieInstruction, RequestCookies};
use crate::error::AuthError;
use crate::permissions::{PermissionCache, PermissionSet};
use crate::session::SessionIssuer;
use crate::token::Decoded;

/// Minimal identity record resolved from the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: i64,
    pub acctype: i64,
}

/// User-record lookup by identity key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_identity(&self, user_id: i64) -> Result<Option<UserIdentity>, AuthError>;
}

/// Per-request identity context.
///
/// Threaded explicitly through request handling; there is no ambient
/// session state. The anonymous identity answers `false`/`None` to
/// every question.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    user: Option<UserIdentity>,
    permission_bits: i64,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: UserIdentity, permissions: &PermissionSet) -> Self {
        Self {
            user: Some(user),
            permission_bits: permissions.bits,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.map(|u| u.user_id)
    }

    pub fn acctype(&self) -> Option<i64> {
        self.user.map(|u| u.acctype)
    }

    pub fn has_permission(&self, bit: i64) -> bool {
        self.is_authenticated() && self.permission_bits & bit == bit
    }
}

/// Result of evaluating one request's cookies.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub identity: Identity,
    /// Access cookie to attach to the outgoing response when the gate
    /// performed a sliding renewal or redeemed a refresh credential.
    pub renewed: Option<CookieInstruction>,
}

impl GateOutcome {
    fn anonymous() -> Self {
        Self {
            identity: Identity::anonymous(),
            renewed: None,
        }
    }
}

/// Decides authentication state for inbound requests.
pub struct AuthGate {
    issuer: SessionIssuer,
    users: Arc<dyn UserStore>,
    permissions: PermissionCache,
}

impl AuthGate {
    pub fn new(issuer: SessionIssuer, users: Arc<dyn UserStore>, permissions: PermissionCache) -> Self {
        Self {
            issuer,
            users,
            permissions,
        }
    }

    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }

    /// Evaluate the request's cookies at `now`.
    ///
    /// A valid access credential authenticates directly and, once past
    /// the midpoint of its validity window, is transparently reissued.
    /// Otherwise a valid refresh credential mints a fresh access
    /// credential after re-resolving the user. Everything else is
    /// anonymous.
    pub async fn evaluate_at(&self, cookies: &RequestCookies, now: DateTime<Utc>) -> GateOutcome {
        if let Some(token) = cookies.get(self.issuer.cookie_name()) {
            match self.issuer.codec().decode_at(token, now) {
                Decoded::Valid(claims) if !claims.is_refresh() => {
                    let Some(acctype) = claims.acctype else {
                        debug!("Access credential without a role claim");
                        return self.redeem_refresh(cookies, now).await;
                    };
                    let user = UserIdentity {
                        user_id: claims.user_id,
                        acctype,
                    };
                    let permissions = self.permissions.get_at(acctype, now).await;
                    let renewed = if claims.past_half_life(now) {
                        self.reissue(user, now)
                    } else {
                        None
                    };
                    return GateOutcome {
                        identity: Identity::authenticated(user, &permissions),
                        renewed,
                    };
                }
                Decoded::Valid(_) => debug!("Refresh-typed token presented in access slot"),
                Decoded::Expired => debug!("Access credential expired"),
                Decoded::Invalid => debug!("Access credential rejected"),
            }
        }

        self.redeem_refresh(cookies, now).await
    }

    pub async fn evaluate(&self, cookies: &RequestCookies) -> GateOutcome {
        self.evaluate_at(cookies, Utc::now()).await
    }

    /// Mint a fresh access credential from a valid refresh credential.
    async fn redeem_refresh(&self, cookies: &RequestCookies, now: DateTime<Utc>) -> GateOutcome {
        let Some(token) = cookies.get(&self.issuer.refresh_cookie_name()) else {
            return GateOutcome::anonymous();
        };
        let Decoded::Valid(claims) = self.issuer.codec().decode_at(token, now) else {
            return GateOutcome::anonymous();
        };
        if !claims.is_refresh() {
            debug!("Non-refresh token presented in refresh slot");
            return GateOutcome::anonymous();
        }

        // Refresh claims carry no role; the user store is authoritative.
        let user = match self.users.get_identity(claims.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user_id = claims.user_id, "Refresh credential for unknown user");
                return GateOutcome::anonymous();
            }
            Err(err) => {
                debug!("User lookup failed during refresh: {}", err);
                return GateOutcome::anonymous();
            }
        };

        let Some(renewed) = self.reissue(user, now) else {
            return GateOutcome::anonymous();
        };
        let permissions = self.permissions.get_at(user.acctype, now).await;
        GateOutcome {
            identity: Identity::authenticated(user, &permissions),
            renewed: Some(renewed),
        }
    }

    fn reissue(&self, user: UserIdentity, now: DateTime<Utc>) -> Option<CookieInstruction> {
        match self.issuer.issue_access_at(user.user_id, user.acctype, now) {
            Ok(credential) => Some(credential.cookie),
            Err(err) => {
                // The current credential keeps working until expiry, so a
                // signing failure only skips the renewal.
                error!("Access credential reissue failed: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{RoleDirectory, permission};
    use crate::session::SessionConfig;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    struct FakeStore(HashMap<i64, UserIdentity>);

    #[async_trait]
    impl UserStore for FakeStore {
        async fn get_identity(&self, user_id: i64) -> Result<Option<UserIdentity>, AuthError> {
            Ok(self.0.get(&user_id).copied())
        }
    }

    struct FakeDirectory;

    #[async_trait]
    impl RoleDirectory for FakeDirectory {
        async fn permissions_for_role(
            &self,
            role_id: i64,
        ) -> Result<Option<PermissionSet>, AuthError> {
            match role_id {
                1 => Ok(Some(PermissionSet {
                    role_id: 1,
                    name: "Admin".to_string(),
                    bits: permission::ALL,
                })),
                2 => Ok(Some(PermissionSet {
                    role_id: 2,
                    name: "Editor".to_string(),
                    bits: permission::VIEW_PROJECTS | permission::EDIT_PROJECTS,
                })),
                _ => Ok(None),
            }
        }
    }

    fn gate() -> AuthGate {
        let issuer = SessionIssuer::new(SessionConfig::new("test-secret-key"));
        let mut users = HashMap::new();
        users.insert(42, UserIdentity { user_id: 42, acctype: 1 });
        users.insert(7, UserIdentity { user_id: 7, acctype: 2 });
        let permissions = PermissionCache::new(
            Arc::new(FakeDirectory),
            Duration::seconds(86_400),
        );
        AuthGate::new(issuer, Arc::new(FakeStore(users)), permissions)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn cookies(pairs: &[(&str, &str)]) -> RequestCookies {
        let header = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        RequestCookies::parse(&header)
    }

    #[tokio::test]
    async fn test_no_cookies_is_anonymous() {
        let gate = gate();
        let outcome = gate.evaluate_at(&RequestCookies::default(), at(0)).await;

        assert!(!outcome.identity.is_authenticated());
        assert_eq!(outcome.identity.user_id(), None);
        assert!(!outcome.identity.has_permission(permission::VIEW_PROJECTS));
        assert!(outcome.renewed.is_none());
    }

    #[tokio::test]
    async fn test_fresh_access_credential_authenticates_without_renewal() {
        let gate = gate();
        let access = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token", &access.token)]);

        let outcome = gate.evaluate_at(&cookies, at(899)).await;

        assert!(outcome.identity.is_authenticated());
        assert_eq!(outcome.identity.user_id(), Some(42));
        assert_eq!(outcome.identity.acctype(), Some(1));
        assert!(outcome.renewed.is_none());
    }

    #[tokio::test]
    async fn test_past_half_life_triggers_reissue() {
        let gate = gate();
        let access = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token", &access.token)]);

        let outcome = gate.evaluate_at(&cookies, at(901)).await;

        assert!(outcome.identity.is_authenticated());
        let renewed = outcome.renewed.expect("expected a renewal cookie");
        assert_eq!(renewed.name, "vitrine_token");

        let claims = gate
            .issuer()
            .codec()
            .decode_at(&renewed.value, at(901))
            .valid()
            .unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.acctype, Some(1));
        assert!(claims.iat > access.claims.iat);
    }

    #[tokio::test]
    async fn test_expired_access_without_refresh_is_anonymous() {
        let gate = gate();
        let access = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token", &access.token)]);

        let outcome = gate.evaluate_at(&cookies, at(1801)).await;

        assert!(!outcome.identity.is_authenticated());
        assert!(outcome.renewed.is_none());
    }

    #[tokio::test]
    async fn test_garbage_access_token_is_anonymous() {
        let gate = gate();
        let cookies = cookies(&[("vitrine_token", "garbage")]);

        let outcome = gate.evaluate_at(&cookies, at(0)).await;

        assert!(!outcome.identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_foreign_secret_is_anonymous() {
        let gate = gate();
        let foreign = SessionIssuer::new(SessionConfig::new("other-secret"));
        let access = foreign.issue_access_at(42, 1, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token", &access.token)]);

        let outcome = gate.evaluate_at(&cookies, at(1)).await;

        assert!(!outcome.identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_token_in_access_slot_is_anonymous() {
        let gate = gate();
        let refresh = gate.issuer().issue_refresh_at(42, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token", &refresh.token)]);

        let outcome = gate.evaluate_at(&cookies, at(1)).await;

        assert!(!outcome.identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_access_token_in_refresh_slot_is_anonymous() {
        let gate = gate();
        let access = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token_refresh", &access.token)]);

        let outcome = gate.evaluate_at(&cookies, at(1)).await;

        assert!(!outcome.identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_expired_access_with_valid_refresh_reissues() {
        let gate = gate();
        let access = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();
        let refresh = gate.issuer().issue_refresh_at(42, at(0)).unwrap();
        let cookies = cookies(&[
            ("vitrine_token", &access.token),
            ("vitrine_token_refresh", &refresh.token),
        ]);

        let outcome = gate.evaluate_at(&cookies, at(3_600)).await;

        assert!(outcome.identity.is_authenticated());
        assert_eq!(outcome.identity.user_id(), Some(42));
        let renewed = outcome.renewed.expect("expected a fresh access cookie");
        assert_eq!(renewed.name, "vitrine_token");
    }

    #[tokio::test]
    async fn test_refresh_alone_authenticates() {
        let gate = gate();
        let refresh = gate.issuer().issue_refresh_at(7, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token_refresh", &refresh.token)]);

        let outcome = gate.evaluate_at(&cookies, at(100)).await;

        assert!(outcome.identity.is_authenticated());
        assert_eq!(outcome.identity.acctype(), Some(2));
        assert!(outcome.identity.has_permission(permission::EDIT_PROJECTS));
        assert!(!outcome.identity.has_permission(permission::MANAGE_USERS));
    }

    #[tokio::test]
    async fn test_refresh_for_unknown_user_is_anonymous() {
        let gate = gate();
        let refresh = gate.issuer().issue_refresh_at(999, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token_refresh", &refresh.token)]);

        let outcome = gate.evaluate_at(&cookies, at(100)).await;

        assert!(!outcome.identity.is_authenticated());
        assert!(outcome.renewed.is_none());
    }

    #[tokio::test]
    async fn test_expired_refresh_is_anonymous() {
        let gate = gate();
        let refresh = gate.issuer().issue_refresh_at(42, at(0)).unwrap();
        let cookies = cookies(&[("vitrine_token_refresh", &refresh.token)]);

        let outcome = gate.evaluate_at(&cookies, at(604_801)).await;

        assert!(!outcome.identity.is_authenticated());
    }

    // End to end: login at t=0, keep browsing, never re-authenticate.
    #[tokio::test]
    async fn test_sliding_session_end_to_end() {
        let gate = gate();
        let original = gate.issuer().issue_access_at(42, 1, at(0)).unwrap();

        // Immediately decodable with the expected identity.
        let claims = gate
            .issuer()
            .codec()
            .decode_at(&original.token, at(0))
            .valid()
            .unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.acctype, Some(1));

        // Just before half-life: no renewal.
        let outcome = gate
            .evaluate_at(&cookies(&[("vitrine_token", &original.token)]), at(899))
            .await;
        assert!(outcome.renewed.is_none());

        // Just past half-life: renewed with a strictly newer iat.
        let outcome = gate
            .evaluate_at(&cookies(&[("vitrine_token", &original.token)]), at(901))
            .await;
        let renewed = outcome.renewed.unwrap();
        let renewed_claims = gate
            .issuer()
            .codec()
            .decode_at(&renewed.value, at(901))
            .valid()
            .unwrap();
        assert!(renewed_claims.iat > original.claims.iat);
        assert_eq!(renewed_claims.user_id, 42);
        assert_ne!(renewed_claims.jti, original.claims.jti);
    }
}
