pub mod cookies;
pub mod handlers;
pub mod schema;

use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod built_info {
    #![allow(dead_code)]
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub async fn new(port: u16, globals: GlobalArgs) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    let schema = schema::build(globals.clone());

    let app = Router::new()
        .route(
            "/graphql",
            get(handlers::graphiql).post(handlers::graphql),
        )
        .route("/health", get(handlers::health))
        .layer(Extension(schema))
        .layer(Extension(globals.clone()))
        .layer(cors_layer(&globals)?)
        .layer(TraceLayer::new_for_http());

    info!("listening on port {port}");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// CORS is passthrough configuration: explicit origins get credentialed
/// access for cookie round-trips, otherwise stay permissive.
fn cors_layer(globals: &GlobalArgs) -> Result<CorsLayer> {
    if globals.cors_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = globals
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}
