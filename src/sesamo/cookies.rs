//! Session cookie serialization and parsing.
//!
//! A token bundle from the backend always becomes exactly one cookie
//! pair on the outgoing response; raw tokens never show up in the
//! GraphQL payload.

use async_graphql::Context;
use axum::http::{header::SET_COOKIE, HeaderMap};
use std::collections::HashMap;

use crate::nhost::types::Session;

/// Access-token cookie, expires with the backend-declared lifetime.
pub const JWT_COOKIE: &str = "hasura-auth-jwt";

/// Refresh-token cookie, fixed lifetime regardless of what the backend
/// declared for the refresh token.
pub const REFRESH_COOKIE: &str = "hasura-auth-refresh";

// 30 days, in seconds
const REFRESH_MAX_AGE: i64 = 60 * 60 * 24 * 30;

/// Append the cookie pair for a session onto the outgoing response.
///
/// Appends, never replaces: previously added `Set-Cookie` values stay.
pub fn set_session_cookies(ctx: &Context<'_>, session: &Session) {
    ctx.append_http_header(
        SET_COOKIE,
        serialize(
            JWT_COOKIE,
            &session.access_token,
            session.access_token_expires_in,
        ),
    );
    ctx.append_http_header(
        SET_COOKIE,
        serialize(REFRESH_COOKIE, &session.refresh_token, REFRESH_MAX_AGE),
    );
}

// TODO SameSite=Strict plus Secure once the gateway is https-only
fn serialize(name: &str, value: &str, max_age: i64) -> String {
    format!("{name}={value}; Max-Age={max_age}; HttpOnly; SameSite=Lax")
}

/// Raw `Cookie` header of the inbound request, if any.
pub fn raw_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
}

/// Parse a raw `Cookie` header into name/value pairs.
pub fn parse(raw: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for pair in raw.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let Some(key) = parts.next().map(str::trim) else {
            continue;
        };
        let Some(val) = parts.next().map(str::trim) else {
            continue;
        };
        if !key.is_empty() {
            cookies.insert(key.to_string(), val.to_string());
        }
    }

    cookies
}
