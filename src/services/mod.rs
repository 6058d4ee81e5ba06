// Service exports
pub mod oracle;
pub mod postgres;
pub mod store;

pub use oracle::{CompatibilityOracle, OpenAiOracle, OracleConfig, OracleError};
pub use postgres::PostgresClient;
pub use store::{InMemoryStore, MatchStore, ProfileStore, StoreError};
