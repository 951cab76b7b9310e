use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::sesamo;
use anyhow::Result;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            backend_url,
            graphiql,
            cors_origins,
        } => {
            // Reject an unparseable backend URL at startup instead of at
            // the first resolver call
            let backend_url = Url::parse(&backend_url)?;

            let globals = GlobalArgs::new(backend_url.to_string(), graphiql, cors_origins);

            sesamo::new(port, globals).await?;
        }
    }

    Ok(())
}
