//! Session issuance
//!
//! Builds signed access and refresh credentials for a user identity and
//! expresses their delivery as cookie instructions. Side effects stop
//! here: applying the instructions to a response is the HTTP layer's
//! job.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cookie::CookieInstruction;
use crate::error::AuthError;
use crate::token::{Claims, TokenCodec};

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 1800;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 604_800;
pub const DEFAULT_COOKIE_NAME: &str = "vitrine_token";

/// Session issuance configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Set the `Secure` flag on issued cookies (HTTPS deployments).
    pub secure_cookies: bool,
}

impl SessionConfig {
    /// Configuration with the documented defaults: 30 minute access
    /// credentials, 7 day refresh credentials.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            secure_cookies: false,
        }
    }
}

/// A freshly signed credential and its delivery instruction.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub token: String,
    pub claims: Claims,
    pub cookie: CookieInstruction,
}

/// Issues access and refresh credentials.
#[derive(Clone)]
pub struct SessionIssuer {
    codec: TokenCodec,
    config: SessionConfig,
}

impl SessionIssuer {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            codec: TokenCodec::new(&config.secret),
            config,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// The refresh credential rides in its own cookie slot.
    pub fn refresh_cookie_name(&self) -> String {
        format!("{}_refresh", self.config.cookie_name)
    }

    pub fn access_ttl(&self) -> Duration {
        self.config.access_ttl
    }

    /// Issue a short-lived access credential at `now`.
    pub fn issue_access_at(
        &self,
        user_id: i64,
        acctype: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential, AuthError> {
        let claims = Claims::access(user_id, acctype, now, self.config.access_ttl);
        let token = self.codec.encode(&claims)?;

        debug!(user_id, "Issued access credential");

        let cookie = CookieInstruction::set(
            self.config.cookie_name.clone(),
            token.clone(),
            now + self.config.access_ttl,
            self.config.secure_cookies,
        );
        Ok(IssuedCredential { token, claims, cookie })
    }

    /// Issue a long-lived refresh credential at `now`.
    pub fn issue_refresh_at(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential, AuthError> {
        let claims = Claims::refresh(user_id, now, self.config.refresh_ttl);
        let token = self.codec.encode(&claims)?;

        debug!(user_id, "Issued refresh credential");

        let cookie = CookieInstruction::set(
            self.refresh_cookie_name(),
            token.clone(),
            now + self.config.refresh_ttl,
            self.config.secure_cookies,
        );
        Ok(IssuedCredential { token, claims, cookie })
    }

    /// Clearing instructions for both cookie slots, regardless of prior
    /// state. The credentials themselves stay valid until natural
    /// expiry; there is no server-side revocation.
    pub fn revoke_all_at(&self, now: DateTime<Utc>) -> [CookieInstruction; 2] {
        [
            CookieInstruction::clear(self.config.cookie_name.clone(), now, self.config.secure_cookies),
            CookieInstruction::clear(self.refresh_cookie_name(), now, self.config.secure_cookies),
        ]
    }

    pub fn issue_access(&self, user_id: i64, acctype: i64) -> Result<IssuedCredential, AuthError> {
        self.issue_access_at(user_id, acctype, Utc::now())
    }

    pub fn issue_refresh(&self, user_id: i64) -> Result<IssuedCredential, AuthError> {
        self.issue_refresh_at(user_id, Utc::now())
    }

    pub fn revoke_all(&self) -> [CookieInstruction; 2] {
        self.revoke_all_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Decoded;
    use chrono::TimeZone;

    fn issuer() -> SessionIssuer {
        SessionIssuer::new(SessionConfig::new("test-secret-key"))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_access_and_refresh_differ_in_expiry_and_name() {
        let issuer = issuer();
        let now = at(1_000);

        let access = issuer.issue_access_at(42, 1, now).unwrap();
        let refresh = issuer.issue_refresh_at(42, now).unwrap();

        assert_eq!(access.claims.exp, 1_000 + 1800);
        assert_eq!(refresh.claims.exp, 1_000 + 604_800);
        assert_eq!(access.cookie.name, "vitrine_token");
        assert_eq!(refresh.cookie.name, "vitrine_token_refresh");
        assert_ne!(access.claims.jti, refresh.claims.jti);
    }

    #[test]
    fn test_refresh_claims_carry_the_marker() {
        let issuer = issuer();
        let refresh = issuer.issue_refresh_at(42, at(1_000)).unwrap();

        assert!(refresh.claims.is_refresh());
        assert_eq!(refresh.claims.acctype, None);
    }

    #[test]
    fn test_issued_token_decodes_to_its_claims() {
        let issuer = issuer();
        let access = issuer.issue_access_at(42, 1, at(1_000)).unwrap();

        let decoded = issuer.codec().decode_at(&access.token, at(1_001));
        assert_eq!(decoded, Decoded::Valid(access.claims));
    }

    #[test]
    fn test_cookie_expiry_matches_claim_expiry() {
        let issuer = issuer();
        let access = issuer.issue_access_at(42, 1, at(1_000)).unwrap();

        assert_eq!(access.cookie.expires_at.timestamp(), access.claims.exp);
        assert!(access.cookie.http_only);
    }

    #[test]
    fn test_revoke_all_clears_both_slots() {
        let issuer = issuer();
        let now = at(1_000_000);

        let [access, refresh] = issuer.revoke_all_at(now);

        assert_eq!(access.name, "vitrine_token");
        assert_eq!(refresh.name, "vitrine_token_refresh");
        assert!(access.expires_at < now);
        assert!(refresh.expires_at < now);
        assert!(access.value.is_empty());
        assert!(refresh.value.is_empty());
    }
}
