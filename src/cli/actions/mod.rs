pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        backend_url: String,
        graphiql: bool,
        cors_origins: Vec<String>,
    },
}
