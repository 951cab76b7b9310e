/// Process-wide configuration, built once at startup and injected into
/// the resolver layer through the schema context.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    pub graphiql: bool,
    pub cors_origins: Vec<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String, graphiql: bool, cors_origins: Vec<String>) -> Self {
        Self {
            backend_url,
            graphiql,
            cors_origins,
        }
    }
}
