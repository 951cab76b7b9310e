//! GraphQL schema: auth mutations plus the refresh-token query.
//!
//! Every operation is one outbound call to the auth backend; on success
//! the session cookies are written straight onto the response headers.

use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject};
use axum::http::HeaderMap;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::cli::globals::GlobalArgs;
use crate::nhost;
use crate::sesamo::cookies;

pub type SesamoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// GraphQL-visible result of `signUp` and `signIn`. Tokens travel in
/// cookies only, never in this payload.
#[derive(SimpleObject, Debug)]
pub struct AuthResponse {
    pub user_id: Option<String>,
    pub needs_email_verification: bool,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register an email/password account with the auth backend.
    #[instrument(skip(self, ctx, password))]
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthResponse> {
        let globals = ctx.data::<GlobalArgs>()?;
        let password = SecretString::from(password);

        let response = nhost::signup(globals, &email, &password).await?;

        let Some(session) = response.session else {
            debug!("signup for {email} pending email verification");
            return Ok(AuthResponse {
                user_id: None,
                needs_email_verification: true,
            });
        };

        cookies::set_session_cookies(ctx, &session);

        Ok(AuthResponse {
            user_id: Some(session.user.id),
            needs_email_verification: false,
        })
    }

    /// Authenticate an existing email/password account.
    #[instrument(skip(self, ctx, password))]
    async fn sign_in(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthResponse> {
        let globals = ctx.data::<GlobalArgs>()?;
        let password = SecretString::from(password);

        let response = nhost::signin(globals, &email, &password).await?;

        let session = response.session;
        cookies::set_session_cookies(ctx, &session);

        Ok(AuthResponse {
            user_id: Some(session.user.id),
            // TODO the backend can hand out a user id before the email is
            // verified, surface that instead of hard-coding false
            needs_email_verification: false,
        })
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Mint a fresh cookie pair from the refresh-token cookie and return
    /// the new access-token lifetime in seconds.
    // TODO return a token-info object instead of the bare expiry
    #[instrument(skip(self, ctx))]
    async fn refresh_token(&self, ctx: &Context<'_>) -> Result<i64> {
        let globals = ctx.data::<GlobalArgs>()?;
        let headers = ctx.data::<HeaderMap>()?;

        let Some(raw) = cookies::raw_cookies(headers) else {
            debug!("no cookie header on request");
            return Err("No cookies".into());
        };

        let parsed = cookies::parse(raw);
        let Some(refresh_token) = parsed.get(cookies::REFRESH_COOKIE) else {
            debug!("no {} cookie", cookies::REFRESH_COOKIE);
            return Err(format!("No {} cookie", cookies::REFRESH_COOKIE).into());
        };

        let session = nhost::refresh(globals, refresh_token).await?;

        cookies::set_session_cookies(ctx, &session);

        Ok(session.access_token_expires_in)
    }
}

/// Build the schema with the process-wide configuration attached, so
/// resolvers reach the backend without touching the environment.
pub fn build(globals: GlobalArgs) -> SesamoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(globals)
        .finish()
}
