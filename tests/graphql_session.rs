//! End-to-end resolver tests against a stub auth backend.
//!
//! Each test boots a small axum router on an ephemeral port, points the
//! schema at it, and asserts on the GraphQL response plus the cookie
//! headers it carries.

use anyhow::Result;
use async_graphql::{value, Request, Value};
use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, StatusCode,
};
use axum::{routing::post, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use sesamo::cli::globals::GlobalArgs;
use sesamo::sesamo::schema::{build, SesamoSchema};

const SIGNUP_PATH: &str = "/v1/auth/signup/email-password";
const SIGNIN_PATH: &str = "/v1/auth/signin/email-password";
const TOKEN_PATH: &str = "/v1/auth/token";

const SIGN_UP: &str =
    r#"mutation { signUp(email: "a@b.com", password: "pw") { userId needsEmailVerification } }"#;
const SIGN_IN: &str =
    r#"mutation { signIn(email: "a@b.com", password: "pw") { userId needsEmailVerification } }"#;
const REFRESH: &str = "query { refreshToken }";

fn session_body(access_token: &str, refresh_token: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "user": {"id": "u1"},
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "accessTokenExpiresIn": expires_in,
    })
}

/// Serve `router` on an ephemeral port and build a schema pointed at it.
async fn schema_for(router: Router) -> Result<SesamoSchema> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });

    Ok(build(GlobalArgs::new(base, false, Vec::new())))
}

fn set_cookies(response: &async_graphql::Response) -> Vec<String> {
    response
        .http_headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn sign_up_writes_cookie_pair() -> Result<()> {
    let backend = Router::new().route(
        SIGNUP_PATH,
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["email"], "a@b.com");
            assert_eq!(body["password"], "pw");
            Json(json!({"session": session_body("AT", "RT", 900), "mfa": null}))
        }),
    );
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_UP).data(HeaderMap::new()))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({"signUp": {"userId": "u1", "needsEmailVerification": false}})
    );
    assert_eq!(
        set_cookies(&response),
        vec![
            "hasura-auth-jwt=AT; Max-Age=900; HttpOnly; SameSite=Lax".to_string(),
            "hasura-auth-refresh=RT; Max-Age=2592000; HttpOnly; SameSite=Lax".to_string(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn sign_up_without_session_needs_verification() -> Result<()> {
    let backend = Router::new().route(SIGNUP_PATH, post(|| async { Json(json!({})) }));
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_UP).data(HeaderMap::new()))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({"signUp": {"userId": null, "needsEmailVerification": true}})
    );
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn sign_up_backend_rejection_writes_no_cookies() -> Result<()> {
    let backend = Router::new().route(SIGNUP_PATH, post(|| async { StatusCode::CONFLICT }));
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_UP).data(HeaderMap::new()))
        .await;

    assert_eq!(response.data, Value::Null);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Failed to sign up: 409 Conflict");
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn sign_in_writes_cookies_and_reports_verified() -> Result<()> {
    let backend = Router::new().route(
        SIGNIN_PATH,
        post(|| async { Json(json!({"session": session_body("AT", "RT", 900)})) }),
    );
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_IN).data(HeaderMap::new()))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({"signIn": {"userId": "u1", "needsEmailVerification": false}})
    );
    assert_eq!(set_cookies(&response).len(), 2);

    Ok(())
}

#[tokio::test]
async fn sign_in_backend_rejection() -> Result<()> {
    let backend = Router::new().route(SIGNIN_PATH, post(|| async { StatusCode::UNAUTHORIZED }));
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_IN).data(HeaderMap::new()))
        .await;

    assert_eq!(response.data, Value::Null);
    assert_eq!(
        response.errors[0].message,
        "Failed to sign in: 401 Unauthorized"
    );
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn sign_in_with_unexpected_body_is_a_decode_error() -> Result<()> {
    let backend = Router::new().route(SIGNIN_PATH, post(|| async { Json(json!({"session": null})) }));
    let schema = schema_for(backend).await?;

    let response = schema
        .execute(Request::new(SIGN_IN).data(HeaderMap::new()))
        .await;

    assert_eq!(response.data, Value::Null);
    assert!(
        response.errors[0]
            .message
            .starts_with("Failed to decode sign in response"),
        "{}",
        response.errors[0].message
    );
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn refresh_without_cookie_header_fails() -> Result<()> {
    let schema = schema_for(Router::new()).await?;

    let response = schema
        .execute(Request::new(REFRESH).data(HeaderMap::new()))
        .await;

    assert_eq!(response.data, Value::Null);
    assert_eq!(response.errors[0].message, "No cookies");
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn refresh_without_refresh_cookie_fails() -> Result<()> {
    let schema = schema_for(Router::new()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "theme=dark; session=abc".parse()?);

    let response = schema.execute(Request::new(REFRESH).data(headers)).await;

    assert_eq!(response.data, Value::Null);
    assert_eq!(response.errors[0].message, "No hasura-auth-refresh cookie");
    assert!(set_cookies(&response).is_empty());

    Ok(())
}

#[tokio::test]
async fn refresh_with_valid_cookie_rotates_the_pair() -> Result<()> {
    let backend = Router::new().route(
        TOKEN_PATH,
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["refreshToken"], "RT0");
            Json(session_body("AT2", "RT2", 600))
        }),
    );
    let schema = schema_for(backend).await?;

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "theme=dark; hasura-auth-refresh=RT0".parse()?);

    let response = schema.execute(Request::new(REFRESH).data(headers)).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data, value!({"refreshToken": 600}));
    assert_eq!(
        set_cookies(&response),
        vec![
            "hasura-auth-jwt=AT2; Max-Age=600; HttpOnly; SameSite=Lax".to_string(),
            "hasura-auth-refresh=RT2; Max-Age=2592000; HttpOnly; SameSite=Lax".to_string(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn refresh_backend_rejection_writes_no_cookies() -> Result<()> {
    let backend = Router::new().route(TOKEN_PATH, post(|| async { StatusCode::UNAUTHORIZED }));
    let schema = schema_for(backend).await?;

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "hasura-auth-refresh=stale".parse()?);

    let response = schema.execute(Request::new(REFRESH).data(headers)).await;

    assert_eq!(response.data, Value::Null);
    assert_eq!(
        response.errors[0].message,
        "Failed to refresh the session: 401 Unauthorized"
    );
    assert!(set_cookies(&response).is_empty());

    Ok(())
}
