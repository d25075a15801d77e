//! [`SqliteStorage`] — the SQLite implementation of [`BlobStorage`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use tribe_core::storage::BlobStorage;

use crate::{Result, schema::SCHEMA};

/// Blob storage backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStorage {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStorage {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl BlobStorage for SqliteStorage {
  type Error = crate::Error;

  async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
    let key = key.to_owned();
    let blob = self
      .conn
      .call(move |conn| {
        let blob: Option<Vec<u8>> = conn
          .query_row(
            "SELECT value FROM blobs WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?;
        Ok(blob)
      })
      .await?;
    Ok(blob)
  }

  async fn write(&self, key: &str, blob: Vec<u8>) -> Result<()> {
    let key_str    = key.to_owned();
    let updated_at = Utc::now().to_rfc3339();
    let len        = blob.len();

    // A single upsert statement, so the replacement is atomic.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![key_str, blob, updated_at],
        )?;
        Ok(())
      })
      .await?;

    debug!(key, bytes = len, "blob written");
    Ok(())
  }
}
