//! Change notification shared by the post and membership stores.
//!
//! Listeners run synchronously, in registration order, on the thread that
//! completed the mutation. A listener may unsubscribe itself or any other
//! listener from inside its callback; the change applies to the rest of the
//! delivery already in progress.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
  next_id: u64,
  entries: Vec<(u64, Callback<E>)>,
}

fn lock<E>(registry: &Mutex<Registry<E>>) -> MutexGuard<'_, Registry<E>> {
  registry.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── Listeners ───────────────────────────────────────────────────────────────

/// An ordered list of callbacks receiving events of type `E`.
pub struct Listeners<E> {
  registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Default for Listeners<E> {
  fn default() -> Self {
    Self {
      registry: Arc::new(Mutex::new(Registry { next_id: 0, entries: Vec::new() })),
    }
  }
}

impl<E> Listeners<E> {
  pub fn new() -> Self { Self::default() }

  /// Register `callback`. Delivery continues until the returned
  /// [`Subscription`] is unsubscribed.
  pub fn subscribe(
    &self,
    callback: impl Fn(&E) + Send + Sync + 'static,
  ) -> Subscription<E> {
    let mut registry = lock(&self.registry);
    let id = registry.next_id;
    registry.next_id += 1;
    registry.entries.push((id, Arc::new(callback)));
    Subscription { registry: self.registry.clone(), id }
  }

  /// Deliver `event` to every listener. The lock is released while a
  /// callback runs, and each listener is re-checked before it is called.
  pub fn emit(&self, event: &E) {
    let snapshot: Vec<(u64, Callback<E>)> = lock(&self.registry).entries.clone();
    for (id, callback) in snapshot {
      let live = lock(&self.registry).entries.iter().any(|(e, _)| *e == id);
      if live {
        callback(event);
      }
    }
  }

  pub fn len(&self) -> usize { lock(&self.registry).entries.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// Handle returned by [`Listeners::subscribe`].
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe).
pub struct Subscription<E> {
  registry: Arc<Mutex<Registry<E>>>,
  id:       u64,
}

impl<E> Subscription<E> {
  /// Stop all future delivery to this listener. Idempotent.
  pub fn unsubscribe(&self) {
    lock(&self.registry).entries.retain(|(id, _)| *id != self.id);
  }

  pub fn is_active(&self) -> bool {
    lock(&self.registry).entries.iter().any(|(id, _)| *id == self.id)
  }
}

impl<E> std::fmt::Debug for Subscription<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("id", &self.id)
      .field("active", &self.is_active())
      .finish()
  }
}
