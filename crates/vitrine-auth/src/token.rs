//! Credential codec
//!
//! Encodes and decodes the signed claim set carried by session cookies.
//! Encoding and signature verification go through HMAC-SHA256; expiry is
//! checked against a caller-supplied clock so the gate (and tests) can
//! evaluate credentials at any instant.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// Marker distinguishing refresh credentials on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Refresh,
}

/// Signed claim set.
///
/// Access credentials carry `acctype`; refresh credentials carry the
/// `type=refresh` marker instead, so one can never be mistaken for the
/// other even if presented in the wrong cookie slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expires at (Unix timestamp)
    pub exp: i64,
    /// User ID
    pub user_id: i64,
    /// Role/account-type. Absent on refresh credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acctype: Option<i64>,
    /// Credential kind marker. Present only on refresh credentials.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenKind>,
    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Build an access claim set valid for `ttl` starting at `now`.
    pub fn access(user_id: i64, acctype: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            user_id,
            acctype: Some(acctype),
            token_type: None,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Build a refresh claim set valid for `ttl` starting at `now`.
    pub fn refresh(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            user_id,
            acctype: None,
            token_type: Some(TokenKind::Refresh),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == Some(TokenKind::Refresh)
    }

    /// Whether the credential is past the midpoint of its validity
    /// window at `now`. Past-half-life credentials are reissued.
    pub fn past_half_life(&self, now: DateTime<Utc>) -> bool {
        let half_life = (self.exp - self.iat) / 2;
        now.timestamp() > self.iat + half_life
    }
}

/// Outcome of decoding a credential.
///
/// Verification failure is an expected, frequent outcome (every
/// anonymous visit), so it is a variant rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Valid(Claims),
    Expired,
    Invalid,
}

impl Decoded {
    pub fn valid(self) -> Option<Claims> {
        match self {
            Decoded::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    /// Convert to a hard error for call sites that explicitly demand a
    /// valid credential.
    pub fn require_valid(self) -> Result<Claims, AuthError> {
        match self {
            Decoded::Valid(claims) => Ok(claims),
            Decoded::Expired => Err(AuthError::TokenExpired),
            Decoded::Invalid => Err(AuthError::InvalidToken),
        }
    }
}

/// Codec for signing and verifying claim sets.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in
        // `decode_at`, not against the library's wall clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a claim set into its opaque string form.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(AuthError::Encoding)
    }

    /// Verify a token and extract its claims, judging expiry at `now`.
    ///
    /// Signature mismatches and structural problems are `Invalid`; a
    /// well-signed token whose `exp` has passed is `Expired`. Enforcing
    /// access-vs-refresh semantics is left to the caller.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Decoded {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(err) => {
                debug!("Token rejected: {}", err);
                return Decoded::Invalid;
            }
        };

        if now.timestamp() > claims.exp {
            return Decoded::Expired;
        }

        Decoded::Valid(claims)
    }

    /// Verify a token against the wall clock.
    pub fn decode(&self, token: &str) -> Decoded {
        self.decode_at(token, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new("test-secret-key");
        let claims = Claims::access(42, 1, at(1_000), Duration::seconds(1800));

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode_at(&token, at(1_001)).valid().unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.acctype, Some(1));
        assert!(!decoded.is_refresh());
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let codec = TokenCodec::new("test-secret-key");
        let claims = Claims::access(42, 1, at(1_000), Duration::seconds(1800));
        let mut token = codec.encode(&claims).unwrap();

        // Flip the last signature character.
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(codec.decode_at(&token, at(1_001)), Decoded::Invalid);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let signer = TokenCodec::new("secret-one");
        let verifier = TokenCodec::new("secret-two");
        let claims = Claims::access(42, 1, at(1_000), Duration::seconds(1800));

        let token = signer.encode(&claims).unwrap();

        assert_eq!(verifier.decode_at(&token, at(1_001)), Decoded::Invalid);
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let codec = TokenCodec::new("test-secret-key");
        let claims = Claims::access(42, 1, at(0), Duration::seconds(1800));
        let token = codec.encode(&claims).unwrap();

        assert!(matches!(codec.decode_at(&token, at(1800)), Decoded::Valid(_)));
        assert_eq!(codec.decode_at(&token, at(1801)), Decoded::Expired);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let codec = TokenCodec::new("test-secret-key");

        assert_eq!(codec.decode_at("not-a-token", at(0)), Decoded::Invalid);
        assert_eq!(codec.decode_at("", at(0)), Decoded::Invalid);
    }

    #[test]
    fn test_require_valid_maps_to_errors() {
        let codec = TokenCodec::new("test-secret-key");
        let claims = Claims::access(42, 1, at(0), Duration::seconds(1800));
        let token = codec.encode(&claims).unwrap();

        assert!(codec.decode_at(&token, at(1)).require_valid().is_ok());
        assert!(matches!(
            codec.decode_at(&token, at(2000)).require_valid(),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            codec.decode_at("junk", at(1)).require_valid(),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_marker_on_the_wire() {
        let claims = Claims::refresh(7, at(1_000), Duration::seconds(604_800));
        let json = serde_json::to_string(&claims).unwrap();

        assert!(claims.is_refresh());
        assert!(json.contains(r#""type":"refresh""#));
        assert!(!json.contains("acctype"));
    }

    #[test]
    fn test_access_claims_omit_refresh_marker() {
        let claims = Claims::access(7, 2, at(1_000), Duration::seconds(1800));
        let json = serde_json::to_string(&claims).unwrap();

        assert!(!json.contains(r#""type""#));
        assert!(json.contains(r#""acctype":2"#));
    }

    #[test]
    fn test_half_life_boundary() {
        let claims = Claims::access(1, 1, at(0), Duration::seconds(1800));

        assert!(!claims.past_half_life(at(899)));
        assert!(!claims.past_half_life(at(900)));
        assert!(claims.past_half_life(at(901)));
    }

    #[test]
    fn test_fresh_jti_per_claim_set() {
        let a = Claims::access(1, 1, at(0), Duration::seconds(1800));
        let b = Claims::access(1, 1, at(0), Duration::seconds(1800));

        assert_ne!(a.jti, b.jti);
    }
}
