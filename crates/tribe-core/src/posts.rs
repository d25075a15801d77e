//! [`PostStore`] — the durable collection of locally authored posts.
//!
//! The whole collection is persisted as one JSON blob under a single key.
//! Every mutation runs read → mutate → write → notify under one async lock,
//! so concurrent callers are serialised and no reader ever observes a
//! half-applied change. The mutation is applied to a working copy; if the
//! write fails the copy is dropped and nothing changes.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::{
  Error, Result,
  listeners::{Listeners, Subscription},
  post::Post,
  storage::BlobStorage,
};

/// Key under which the collection is stored unless overridden.
pub const DEFAULT_POSTS_KEY: &str = "posts";

// ─── Outcomes and events ─────────────────────────────────────────────────────

/// The result of [`PostStore::toggle_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
  /// A durable post had its like flipped. Holds the post as persisted.
  Toggled(Post),
  /// A filler post was copied into the durable collection as liked.
  Promoted(Post),
  /// The id is not durable and no usable seed was supplied.
  Missed,
}

impl LikeOutcome {
  pub fn post(&self) -> Option<&Post> {
    match self {
      Self::Toggled(post) | Self::Promoted(post) => Some(post),
      Self::Missed => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostEventKind {
  Toggled,
  Promoted,
  Published,
}

/// Delivered to subscribers once per completed, persisted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEvent {
  pub kind: PostEventKind,
  pub post: Post,
}

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct PostStore<S> {
  storage:   S,
  key:       String,
  write:     Mutex<()>,
  listeners: Listeners<PostEvent>,
}

impl<S: BlobStorage> PostStore<S> {
  pub fn new(storage: S) -> Self { Self::with_key(storage, DEFAULT_POSTS_KEY) }

  pub fn with_key(storage: S, key: impl Into<String>) -> Self {
    Self {
      storage,
      key: key.into(),
      write: Mutex::new(()),
      listeners: Listeners::new(),
    }
  }

  pub fn storage(&self) -> &S { &self.storage }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Read and decode the durable collection. A missing blob is an empty
  /// collection; an unreadable or undecodable one is
  /// [`Error::StorageRead`].
  pub async fn try_load(&self) -> Result<Vec<Post>> {
    let blob = self.storage.read(&self.key).await.map_err(Error::read)?;
    match blob {
      None => Ok(Vec::new()),
      Some(bytes) => serde_json::from_slice(&bytes).map_err(Error::read),
    }
  }

  /// The durable collection exactly as stored: no filler, no identity
  /// overlay. Falls back to an empty collection if storage is unreadable;
  /// the stored blob is left in place.
  pub async fn load(&self) -> Vec<Post> {
    match self.try_load().await {
      Ok(posts) => posts,
      Err(e) => {
        warn!(key = %self.key, error = %e, "post collection unreadable, serving empty");
        Vec::new()
      }
    }
  }

  pub async fn get(&self, post_id: &str) -> Option<Post> {
    self.load().await.into_iter().find(|p| p.id == post_id)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Flip the like on `post_id`.
  ///
  /// If the id is not durable and `seed` is the filler post the caller was
  /// showing, a liked copy of it is promoted into the durable collection.
  /// Without a seed the call is a deliberate no-op. A seed whose id differs
  /// from `post_id` is ignored.
  ///
  /// Subscribers are notified after the write succeeds and before this
  /// returns. Fails with [`Error::StorageRead`] without writing anything if
  /// the current collection cannot be read, and with [`Error::StorageWrite`]
  /// if persisting fails.
  pub async fn toggle_like(
    &self,
    post_id: &str,
    seed: Option<&Post>,
  ) -> Result<LikeOutcome> {
    let _guard = self.write.lock().await;
    let mut posts = self.try_load().await?;

    let (kind, post) = match posts.iter_mut().find(|p| p.id == post_id) {
      Some(post) => {
        post.toggle_like();
        (PostEventKind::Toggled, post.clone())
      }
      None => match seed {
        Some(seed) if seed.id == post_id => {
          let promoted = seed.promoted();
          posts.push(promoted.clone());
          (PostEventKind::Promoted, promoted)
        }
        Some(seed) => {
          warn!(post_id, seed_id = %seed.id, "seed does not match post id, ignoring");
          return Ok(LikeOutcome::Missed);
        }
        None => {
          debug!(post_id, "like toggled on unknown post");
          return Ok(LikeOutcome::Missed);
        }
      },
    };

    self.persist(&posts).await?;

    debug!(post_id, ?kind, likes = post.stats.likes, "post liked state changed");
    self.listeners.emit(&PostEvent { kind, post: post.clone() });

    Ok(match kind {
      PostEventKind::Promoted => LikeOutcome::Promoted(post),
      _ => LikeOutcome::Toggled(post),
    })
  }

  /// Write `post` into the durable collection: a post with the same id is
  /// replaced in place, otherwise it is appended. Used by the compose flow.
  /// A liked post claiming zero likes is stored with one.
  pub async fn publish(&self, mut post: Post) -> Result<()> {
    post.count_own_like();
    let _guard = self.write.lock().await;
    let mut posts = self.try_load().await?;

    match posts.iter_mut().find(|p| p.id == post.id) {
      Some(existing) => *existing = post.clone(),
      None => posts.push(post.clone()),
    }

    self.persist(&posts).await?;
    debug!(post_id = %post.id, "post published");
    self.listeners.emit(&PostEvent { kind: PostEventKind::Published, post });
    Ok(())
  }

  async fn persist(&self, posts: &[Post]) -> Result<()> {
    let blob = serde_json::to_vec(posts).map_err(Error::write)?;
    self.storage.write(&self.key, blob).await.map_err(|e| {
      error!(key = %self.key, error = %e, "failed to persist post collection");
      Error::write(e)
    })
  }

  // ── Notification ──────────────────────────────────────────────────────────

  /// Register a listener invoked once per completed mutation.
  pub fn subscribe(
    &self,
    listener: impl Fn(&PostEvent) + Send + Sync + 'static,
  ) -> Subscription<PostEvent> {
    self.listeners.subscribe(listener)
  }
}
