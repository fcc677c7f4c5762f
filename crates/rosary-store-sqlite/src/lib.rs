//! SQLite backend for the Rosary store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Because that thread owns the only
//! connection, every store call is serialized; multi-row writes additionally
//! run inside `BEGIN IMMEDIATE` transactions so other processes sharing the
//! file cannot interleave with them.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
