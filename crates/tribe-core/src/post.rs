//! Post types — the unit of content shown in every feed.
//!
//! A post embeds a snapshot of its author. For posts written by the current
//! user that snapshot is only a cache; the live identity is overlaid at
//! projection time (see [`crate::feed::project`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Author ──────────────────────────────────────────────────────────────────

/// A point-in-time copy of a user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Stable join key; never rewritten by an overlay.
  pub handle: String,
  pub name:   String,
  pub avatar: Option<String>,
  /// Verification status as shown next to the name (e.g. "verified").
  pub status: Option<String>,
}

impl Author {
  pub fn new(handle: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      handle: handle.into(),
      name:   name.into(),
      avatar: None,
      status: None,
    }
  }
}

// ─── Content ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
  Image,
  Video,
}

/// An attachment referenced by URL; no binary data is stored with the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
  pub url:  String,
  pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
  pub likes: u32,
}

/// A reply attached to a post. Owned by its post; no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:       String,
  pub author:   Author,
  pub text:     String,
  #[serde(default)]
  pub is_liked: bool,
}

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  /// Opaque id. Stable for durable posts; regenerated for filler.
  pub id:         String,
  pub author:     Author,
  /// The tribe this post was shared into, if any.
  #[serde(default)]
  pub tribe_id:   Option<String>,
  pub body:       Option<String>,
  #[serde(default)]
  pub media:      Vec<Media>,
  /// Activity tag, e.g. "Running" or "Yoga".
  #[serde(default)]
  pub activity:   Option<String>,
  pub created_at: DateTime<Utc>,
  pub stats:      PostStats,
  pub is_liked:   bool,
  /// Insertion order.
  #[serde(default)]
  pub comments:   Vec<Comment>,
}

impl Post {
  /// A text post with no likes, media or comments, stamped now.
  pub fn new(id: impl Into<String>, author: Author, body: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      author,
      tribe_id: None,
      body: Some(body.into()),
      media: Vec::new(),
      activity: None,
      created_at: Utc::now(),
      stats: PostStats::default(),
      is_liked: false,
      comments: Vec::new(),
    }
  }

  pub fn comment_count(&self) -> usize { self.comments.len() }

  /// Flip the viewer's like and adjust the counter to match. Unliking never
  /// takes the counter below zero.
  pub fn toggle_like(&mut self) {
    self.is_liked = !self.is_liked;
    self.stats.likes = if self.is_liked {
      self.stats.likes.saturating_add(1)
    } else {
      self.stats.likes.saturating_sub(1)
    };
  }

  /// A liked post counts the viewer's like: raise `likes` to 1 if it claims
  /// none.
  pub fn count_own_like(&mut self) {
    if self.is_liked && self.stats.likes == 0 {
      self.stats.likes = 1;
    }
  }

  /// The durable copy written when a filler post is liked: liked, with one
  /// more like than the filler showed.
  pub fn promoted(&self) -> Self {
    let mut post = self.clone();
    post.is_liked = true;
    post.stats.likes = post.stats.likes.saturating_add(1);
    post
  }
}
