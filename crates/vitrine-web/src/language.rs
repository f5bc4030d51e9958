//! Language selection middleware
//!
//! Resolves the request language and threads it through request
//! extensions as an explicit [`Lang`] value. An explicit `?lang=`
//! choice is remembered in a dedicated cookie.

use axum::{
    extract::{Request, State},
    http::header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use tracing::warn;
use vitrine_auth::{CookieInstruction, RequestCookies};
use vitrine_core::{LANG_COOKIE, negotiate_language};

use crate::state::AppState;

/// The negotiated language code for the current request.
#[derive(Debug, Clone)]
pub struct Lang(pub String);

fn lang_query_param(query: &str) -> Option<String> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("lang="))
        .filter(|code| !code.is_empty())
        .map(|code| code.to_string())
}

pub async fn language_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let available = state.db.active_languages().await.unwrap_or_default();

    let query_lang = request.uri().query().and_then(lang_query_param);
    let cookie_header = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let cookie_lang = RequestCookies::parse(&cookie_header)
        .get(LANG_COOKIE)
        .map(|code| code.to_string());
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let code = negotiate_language(
        &available,
        query_lang.as_deref(),
        cookie_lang.as_deref(),
        accept_language.as_deref(),
        &state.default_language,
    );

    // Persist an explicit choice so later requests keep the language.
    let remember = query_lang.as_deref() == Some(code.as_str())
        && cookie_lang.as_deref() != Some(code.as_str());

    request.extensions_mut().insert(Lang(code.clone()));

    let mut response = next.run(request).await;

    if remember {
        let mut cookie =
            CookieInstruction::set(LANG_COOKIE, code, Utc::now() + Duration::days(365), false);
        cookie.http_only = false;
        match cookie.header_value().parse() {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => warn!("Skipping unparsable language cookie: {}", err),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_query_param() {
        assert_eq!(lang_query_param("lang=en"), Some("en".to_string()));
        assert_eq!(lang_query_param("page=2&lang=fr"), Some("fr".to_string()));
        assert_eq!(lang_query_param("lang="), None);
        assert_eq!(lang_query_param("language=en"), None);
    }
}
