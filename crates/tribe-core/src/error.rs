//! Error types for `tribe-core`.

use thiserror::Error;

/// A boxed storage backend error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The persisted post collection is unavailable or cannot be decoded.
  #[error("failed to read post collection: {0}")]
  StorageRead(#[source] BoxError),

  /// Persisting a mutation failed. The mutation did not take effect.
  #[error("failed to write post collection: {0}")]
  StorageWrite(#[source] BoxError),
}

impl Error {
  pub(crate) fn read(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StorageRead(Box::new(e))
  }

  pub(crate) fn write(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StorageWrite(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
