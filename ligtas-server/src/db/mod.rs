//! Database layer - connection pool, schema and repositories
//!
//! - Connection pool, no Arc<Mutex<Connection>>
//! - Validated types in, stored rows out
//! - Single-statement writes (INSERT ... RETURNING)

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options};
pub use repos::*;
