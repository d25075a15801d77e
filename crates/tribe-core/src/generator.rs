//! The content generator seam.
//!
//! Generators pad an otherwise empty feed with synthetic posts, user cards and
//! tribe suggestions. Their output is advisory: nothing here is persisted,
//! and ids are not trusted to be unique across calls.

use serde::{Deserialize, Serialize};

use crate::{
  post::{Author, Post},
  tribe::Tribe,
};

/// A suggested user to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCard {
  pub author:   Author,
  pub bio:      Option<String>,
  pub activity: Option<String>,
}

/// One entry of generator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum FeedItem {
  Post(Post),
  User(UserCard),
  Tribe(Tribe),
}

impl FeedItem {
  pub fn into_post(self) -> Option<Post> {
    match self {
      Self::Post(post) => Some(post),
      Self::User(_) | Self::Tribe(_) => None,
    }
  }

  /// Keep only the posts, in order.
  pub fn posts(items: impl IntoIterator<Item = FeedItem>) -> Vec<Post> {
    items.into_iter().filter_map(Self::into_post).collect()
  }
}

/// Produces `count` synthetic entities per call.
pub trait ContentGenerator: Send + Sync {
  fn generate(&self, count: usize) -> Vec<FeedItem>;
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for std::sync::Arc<G> {
  fn generate(&self, count: usize) -> Vec<FeedItem> { (**self).generate(count) }
}

/// Replays a fixed batch, truncated to `count`.
impl ContentGenerator for Vec<FeedItem> {
  fn generate(&self, count: usize) -> Vec<FeedItem> {
    self.iter().take(count).cloned().collect()
  }
}
