//! Vitrine Authentication and Session Lifecycle
//!
//! This crate provides the cookie-credential session system for the
//! Vitrine site: a signed, short-lived access credential with sliding
//! renewal, a long-lived refresh credential, and role/permission
//! resolution with a TTL cache.

pub mod cookie;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod session;
pub mod token;

pub use cookie::{CookieInstruction, RequestCookies, SameSite};
pub use error::AuthError;
pub use gate::{AuthGate, GateOutcome, Identity, UserIdentity, UserStore};
pub use middleware::identity_middleware;
pub use password::{hash_password, verify_password};
pub use permissions::{PermissionCache, PermissionSet, RoleDirectory, permission};
pub use session::{IssuedCredential, SessionConfig, SessionIssuer};
pub use token::{Claims, Decoded, TokenCodec, TokenKind};
