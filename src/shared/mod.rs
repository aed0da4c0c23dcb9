// Shared kernel: database pool, errors, response cache, logging, validation

pub mod cache;
pub mod database;
pub mod errors;
pub mod utils;

// Re-exports for convenience
pub use database::{Database, DbConnection, DbPool};
