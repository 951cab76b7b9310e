pub mod graphql;
pub use self::graphql::{graphiql, graphql};

pub mod health;
pub use self::health::health;
