//! SQLite backend for the Tribe post store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Blobs live in a single key/value
//! table; see [`schema`].

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStorage;

#[cfg(test)]
mod tests;
