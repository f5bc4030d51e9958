//! Axum integration for the authentication gate

use axum::{
    extract::{Request, State},
    http::header::{COOKIE, SET_COOKIE},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::cookie::RequestCookies;
use crate::gate::AuthGate;

/// Resolves the request's identity and stores it in request extensions.
///
/// Sliding-renewal cookies produced by the gate are appended to the
/// outgoing response. This middleware never rejects a request; invalid
/// or missing credentials yield the anonymous identity.
pub async fn identity_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let cookies = RequestCookies::parse(&header);

    let outcome = gate.evaluate(&cookies).await;
    request.extensions_mut().insert(outcome.identity);

    let mut response = next.run(request).await;

    if let Some(cookie) = outcome.renewed {
        match cookie.header_value().parse() {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => warn!("Skipping unparsable renewal cookie: {}", err),
        }
    }

    response
}
