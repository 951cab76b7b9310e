//! Client for the remote auth backend (signup, signin, token refresh).
//!
//! One outbound POST per operation, no retries: a failure here surfaces
//! to the caller and nothing else changes.

pub mod error;
pub mod types;

pub use self::error::BackendError;

use crate::cli::globals::GlobalArgs;
use crate::sesamo::APP_USER_AGENT;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, instrument};
use url::Url;

use self::types::{Session, SignInResponse, SignUpResponse};

/// Normalize the backend base URL into a full endpoint URL.
#[instrument]
pub fn endpoint_url(base: &str, endpoint: &str) -> Result<String, BackendError> {
    let url = Url::parse(base)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| BackendError::Config("no host in backend URL".to_string()))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => {
                return Err(BackendError::Config(format!(
                    "unsupported scheme {scheme} in backend URL"
                )))
            }
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{endpoint}");

    debug!("endpoint URL: {}", endpoint);

    Ok(endpoint_url)
}

/// Register an email/password account. A response without a session
/// means the account still needs email verification.
#[instrument(skip(password))]
pub async fn signup(
    globals: &GlobalArgs,
    email: &str,
    password: &SecretString,
) -> Result<SignUpResponse, BackendError> {
    post(
        globals,
        "sign up",
        "/v1/auth/signup/email-password",
        json!({
            "email": email,
            "password": password.expose_secret(),
        }),
    )
    .await
}

/// Authenticate an email/password account.
#[instrument(skip(password))]
pub async fn signin(
    globals: &GlobalArgs,
    email: &str,
    password: &SecretString,
) -> Result<SignInResponse, BackendError> {
    post(
        globals,
        "sign in",
        "/v1/auth/signin/email-password",
        json!({
            "email": email,
            "password": password.expose_secret(),
        }),
    )
    .await
}

/// Trade a refresh token for a fresh session.
#[instrument(skip_all)]
pub async fn refresh(globals: &GlobalArgs, refresh_token: &str) -> Result<Session, BackendError> {
    post(
        globals,
        "refresh the session",
        "/v1/auth/token",
        json!({
            "refreshToken": refresh_token,
        }),
    )
    .await
}

async fn post<T: DeserializeOwned>(
    globals: &GlobalArgs,
    operation: &'static str,
    endpoint: &str,
    payload: serde_json::Value,
) -> Result<T, BackendError> {
    let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

    let url = endpoint_url(&globals.backend_url, endpoint)?;

    let response = client.post(&url).json(&payload).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        error!("{} - {}", url, status);

        return Err(BackendError::Status { operation, status });
    }

    response.json::<T>().await.map_err(|source| {
        error!("unexpected response from {}: {}", url, source);

        BackendError::Decode { operation, source }
    })
}
