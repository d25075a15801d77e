//! The current user's identity, as supplied by the identity provider.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::post::Author;

/// A read-only copy of the current user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
  pub handle:        String,
  pub name:          String,
  #[serde(default)]
  pub avatar:        Option<String>,
  #[serde(default)]
  pub status:        Option<String>,
  #[serde(default)]
  pub activity:      Option<String>,
  #[serde(default)]
  pub activity_icon: Option<String>,
}

impl IdentitySnapshot {
  /// An [`Author`] reflecting this profile.
  pub fn author(&self) -> Author {
    Author {
      handle: self.handle.clone(),
      name:   self.name.clone(),
      avatar: self.avatar.clone(),
      status: self.status.clone(),
    }
  }

  /// Replace the display fields of `author` with the live values. The handle
  /// is left untouched.
  pub fn overlay(&self, author: &mut Author) {
    author.name = self.name.clone();
    author.avatar = self.avatar.clone();
    author.status = self.status.clone();
  }
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Pull-based access to the current user's profile. Called on every
/// projection; implementations must return the latest values.
pub trait IdentityProvider: Send + Sync {
  fn snapshot(&self) -> IdentitySnapshot;
}

impl IdentityProvider for IdentitySnapshot {
  fn snapshot(&self) -> IdentitySnapshot { self.clone() }
}

/// A profile that can be edited while feeds hold a handle to it.
impl IdentityProvider for RwLock<IdentitySnapshot> {
  fn snapshot(&self) -> IdentitySnapshot {
    self.read().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
  fn snapshot(&self) -> IdentitySnapshot { (**self).snapshot() }
}
