mod gateway;
mod memory_store;
pub mod schema;
mod sqlite_store;

#[cfg(feature = "mock")]
pub use gateway::MockStoreGateway;
pub use gateway::{StoreGateway, TableCounts};
pub use memory_store::InMemoryStore;
pub use sqlite_store::SqliteStore;
