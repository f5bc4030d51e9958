//! Language negotiation

use vitrine_db::Language;

/// Cookie remembering the visitor's language choice. Readable by
/// client-side scripts, unlike the session cookies.
pub const LANG_COOKIE: &str = "vitrine_lang";

/// Pick the language for a request.
///
/// Priority: explicit `?lang=` query parameter, then the language
/// cookie, then the first `Accept-Language` entry matching an active
/// language, then the configured default. The default must itself be
/// active, otherwise the first active language wins.
pub fn negotiate_language(
    available: &[Language],
    query: Option<&str>,
    cookie: Option<&str>,
    accept_language: Option<&str>,
    default: &str,
) -> String {
    let is_active = |code: &str| available.iter().any(|l| l.code == code);

    if let Some(code) = query
        && is_active(code)
    {
        return code.to_string();
    }

    if let Some(code) = cookie
        && is_active(code)
    {
        return code.to_string();
    }

    if let Some(header) = accept_language {
        for entry in header.split(',') {
            // "fr-FR;q=0.9" -> "fr"
            let tag = entry.split(';').next().unwrap_or("").trim();
            let primary = tag.split('-').next().unwrap_or("");
            if is_active(primary) {
                return primary.to_string();
            }
        }
    }

    if is_active(default) {
        return default.to_string();
    }

    available
        .first()
        .map(|l| l.code.clone())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<Language> {
        codes
            .iter()
            .enumerate()
            .map(|(i, code)| Language {
                id: i as i64 + 1,
                code: code.to_string(),
                name: code.to_uppercase(),
                is_active: true,
            })
            .collect()
    }

    #[test]
    fn test_query_parameter_wins() {
        let available = langs(&["fr", "en"]);
        let chosen = negotiate_language(&available, Some("en"), Some("fr"), Some("fr"), "fr");
        assert_eq!(chosen, "en");
    }

    #[test]
    fn test_cookie_beats_accept_language() {
        let available = langs(&["fr", "en"]);
        let chosen = negotiate_language(&available, None, Some("en"), Some("fr-FR"), "fr");
        assert_eq!(chosen, "en");
    }

    #[test]
    fn test_accept_language_primary_subtag() {
        let available = langs(&["fr", "en"]);
        let chosen = negotiate_language(&available, None, None, Some("de-DE,en-GB;q=0.8"), "fr");
        assert_eq!(chosen, "en");
    }

    #[test]
    fn test_unknown_choices_fall_back_to_default() {
        let available = langs(&["fr", "en"]);
        let chosen = negotiate_language(&available, Some("de"), Some("es"), Some("it"), "fr");
        assert_eq!(chosen, "fr");
    }

    #[test]
    fn test_inactive_default_falls_back_to_first_active() {
        let available = langs(&["en"]);
        let chosen = negotiate_language(&available, None, None, None, "fr");
        assert_eq!(chosen, "en");
    }
}
