//! The `BlobStorage` trait — opaque key/value persistence.
//!
//! The post store keeps its whole collection under a single key as one
//! serialised blob. Backends (e.g. `tribe-store-sqlite`) only need to move
//! bytes; the encoding belongs to the caller.

use std::{collections::HashMap, convert::Infallible, future::Future, sync::Mutex};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a key/value blob backend.
///
/// A `write` must replace the value atomically: a later `read` sees either
/// the old blob or the new one, never a mix.
pub trait BlobStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the blob stored under `key`. Returns `None` if nothing was ever
  /// written.
  fn read<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Store `blob` under `key`, replacing any previous value.
  fn write<'a>(
    &'a self,
    key: &'a str,
    blob: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A process-local backend — useful for testing.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
  pub fn new() -> Self { Self::default() }

  fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
    self.blobs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
  }
}

impl BlobStorage for MemoryStorage {
  type Error = Infallible;

  async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, Infallible> {
    Ok(self.blobs().get(key).cloned())
  }

  async fn write(&self, key: &str, blob: Vec<u8>) -> Result<(), Infallible> {
    self.blobs().insert(key.to_owned(), blob);
    Ok(())
  }
}
