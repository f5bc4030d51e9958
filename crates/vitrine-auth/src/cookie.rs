//! Cookie instructions and request-cookie parsing
//!
//! The session layer never writes to a transport. It returns
//! [`CookieInstruction`] values that the HTTP layer renders into
//! `Set-Cookie` headers.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

/// A cookie to set (or clear) on the outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieInstruction {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieInstruction {
    /// Instruction to store `value` under `name` until `expires_at`.
    pub fn set(
        name: impl Into<String>,
        value: impl Into<String>,
        expires_at: DateTime<Utc>,
        secure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at,
            path: "/".to_string(),
            http_only: true,
            secure,
            same_site: SameSite::Lax,
        }
    }

    /// Instruction to discard the cookie named `name`.
    ///
    /// The expiry lands an hour in the past, far enough for any client
    /// clock skew.
    pub fn clear(name: impl Into<String>, now: DateTime<Utc>, secure: bool) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            expires_at: now - Duration::hours(1),
            path: "/".to_string(),
            http_only: true,
            secure,
            same_site: SameSite::Lax,
        }
    }

    /// Render the `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Expires={}; Path={}; SameSite={}",
            self.name,
            self.value,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path,
            self.same_site.as_str(),
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Cookies presented by an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies(HashMap<String, String>);

impl RequestCookies {
    /// Parse a `Cookie` header. Malformed pairs are skipped.
    pub fn parse(header: &str) -> Self {
        let mut cookies = HashMap::new();
        for pair in header.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                cookies.insert(name.to_string(), value.trim().to_string());
            }
        }
        Self(cookies)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_header_value_attributes() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cookie = CookieInstruction::set("vitrine_token", "abc", expires, false);

        let header = cookie.header_value();
        assert!(header.starts_with("vitrine_token=abc; "));
        assert!(header.contains("Expires=Sun, 01 Mar 2026 12:00:00 GMT"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("HttpOnly"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_secure_flag() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cookie = CookieInstruction::set("vitrine_token", "abc", expires, true);

        assert!(cookie.header_value().contains("; Secure"));
    }

    #[test]
    fn test_clear_expires_in_the_past() {
        let now = Utc::now();
        let cookie = CookieInstruction::clear("vitrine_token", now, false);

        assert!(cookie.expires_at < now);
        assert!(cookie.value.is_empty());
    }

    #[test]
    fn test_parse_cookie_header() {
        let cookies = RequestCookies::parse("vitrine_token=abc; vitrine_token_refresh=def");

        assert_eq!(cookies.get("vitrine_token"), Some("abc"));
        assert_eq!(cookies.get("vitrine_token_refresh"), Some("def"));
        assert_eq!(cookies.get("other"), None);
    }

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let cookies = RequestCookies::parse("bare; =novalue; ok=1");

        assert_eq!(cookies.get("ok"), Some("1"));
        assert_eq!(cookies.get("bare"), None);
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(RequestCookies::parse("").is_empty());
    }
}
