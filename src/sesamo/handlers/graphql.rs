use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};

use crate::cli::globals::GlobalArgs;
use crate::sesamo::schema::SesamoSchema;

/// Execute a GraphQL request.
///
/// The inbound headers ride along in the request context so resolvers
/// can read cookies; `Set-Cookie` values written by resolvers come back
/// on the schema response and land on the HTTP response here, no CORS
/// header relay involved.
pub async fn graphql(
    Extension(schema): Extension<SesamoSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema
        .execute(request.into_inner().data(headers))
        .await
        .into()
}

// axum handler for the GraphiQL explorer
pub async fn graphiql(Extension(globals): Extension<GlobalArgs>) -> impl IntoResponse {
    if globals.graphiql {
        Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
