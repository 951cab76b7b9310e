//! Wire schemas for the auth backend responses.
//!
//! The backend speaks camelCase JSON. Decoding at this boundary means a
//! 200 with an unexpected body shows up as a decode error instead of a
//! panic somewhere inside a resolver.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct User {
    pub id: String,
}

/// Session token bundle plus the user it belongs to.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// `POST /v1/auth/signup/email-password`. No session means the account
/// still needs email verification.
#[derive(Deserialize, Debug)]
pub struct SignUpResponse {
    pub session: Option<Session>,
    pub mfa: Option<serde_json::Value>,
}

/// `POST /v1/auth/signin/email-password`. Signin always carries a
/// session; a 200 without one fails decoding.
#[derive(Deserialize, Debug)]
pub struct SignInResponse {
    pub session: Session,
    pub mfa: Option<serde_json::Value>,
}
