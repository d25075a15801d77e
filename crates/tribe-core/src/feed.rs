//! Feed assembly — the one place durable posts and filler are merged.
//!
//! Every screen that shows posts goes through [`Feed::assemble`] (or
//! [`project`] directly when it already holds both inputs), so ordering,
//! de-duplication and identity overlay are identical everywhere.

use std::{collections::HashSet, sync::Arc};

use crate::{
  generator::{ContentGenerator, FeedItem},
  identity::{IdentityProvider, IdentitySnapshot},
  post::Post,
  posts::PostStore,
  storage::BlobStorage,
};

// ─── Projection ──────────────────────────────────────────────────────────────

/// Merge `durable` posts with `filler` for display to `me`.
///
/// Output order: the user's own durable posts (author display fields
/// overlaid with `me`), then the other durable posts, then filler whose id
/// is not already durable. Each group keeps its input order.
pub fn project(
  durable: Vec<Post>,
  filler: Vec<Post>,
  me: &IdentitySnapshot,
) -> Vec<Post> {
  let durable_ids: HashSet<String> =
    durable.iter().map(|p| p.id.clone()).collect();

  let (mut own, others): (Vec<Post>, Vec<Post>) = durable
    .into_iter()
    .partition(|p| p.author.handle == me.handle);
  for post in &mut own {
    me.overlay(&mut post.author);
  }

  own
    .into_iter()
    .chain(others)
    .chain(filler.into_iter().filter(|p| !durable_ids.contains(&p.id)))
    .collect()
}

/// Keep only posts shared into `tribe_id`.
pub fn for_tribe(posts: Vec<Post>, tribe_id: &str) -> Vec<Post> {
  posts
    .into_iter()
    .filter(|p| p.tribe_id.as_deref() == Some(tribe_id))
    .collect()
}

// ─── Feed ────────────────────────────────────────────────────────────────────

/// A post store, a generator and an identity provider bundled behind a
/// single assembly call.
pub struct Feed<S, G, I> {
  posts:     Arc<PostStore<S>>,
  generator: G,
  identity:  I,
}

impl<S, G, I> Feed<S, G, I>
where
  S: BlobStorage,
  G: ContentGenerator,
  I: IdentityProvider,
{
  pub fn new(posts: Arc<PostStore<S>>, generator: G, identity: I) -> Self {
    Self { posts, generator, identity }
  }

  pub fn posts(&self) -> &Arc<PostStore<S>> { &self.posts }

  /// Fresh filler posts from the generator. Not persisted.
  pub fn filler(&self, count: usize) -> Vec<Post> {
    FeedItem::posts(self.generator.generate(count))
  }

  /// Load, generate `filler_count` entities and project. The identity is
  /// re-read on every call.
  pub async fn assemble(&self, filler_count: usize) -> Vec<Post> {
    let durable = self.posts.load().await;
    let filler = self.filler(filler_count);
    project(durable, filler, &self.identity.snapshot())
  }

  /// [`assemble`](Self::assemble), narrowed to one tribe when `tribe_id` is
  /// set.
  pub async fn assemble_for(
    &self,
    filler_count: usize,
    tribe_id: Option<&str>,
  ) -> Vec<Post> {
    let posts = self.assemble(filler_count).await;
    match tribe_id {
      Some(id) => for_tribe(posts, id),
      None => posts,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::RwLock;

  use super::*;
  use crate::{
    post::{Author, Post},
    storage::MemoryStorage,
  };

  fn me(name: &str) -> IdentitySnapshot {
    IdentitySnapshot {
      handle:        "u1".into(),
      name:          name.into(),
      avatar:        Some("me.png".into()),
      status:        Some("verified".into()),
      activity:      Some("Running".into()),
      activity_icon: None,
    }
  }

  fn post(id: &str, handle: &str, likes: u32) -> Post {
    let mut p = Post::new(id, Author::new(handle, "stale name"), "hill repeats");
    p.stats.likes = likes;
    p
  }

  fn ids(posts: &[Post]) -> Vec<&str> { posts.iter().map(|p| p.id.as_str()).collect() }

  #[test]
  fn own_posts_first_then_others_then_filler() {
    let durable = vec![post("o1", "u2", 0), post("s1", "u1", 0), post("o2", "u3", 0), post("s2", "u1", 0)];
    let filler = vec![post("f1", "u9", 0), post("f2", "u8", 0)];

    let out = project(durable, filler, &me("Alice"));
    assert_eq!(ids(&out), vec!["s1", "s2", "o1", "o2", "f1", "f2"]);
  }

  #[test]
  fn duplicate_filler_id_is_dropped() {
    let mut d1 = post("d1", "u1", 5);
    d1.is_liked = false;
    let filler = vec![post("f1", "u9", 0), post("d1", "u1", 0)];

    let out = project(vec![d1], filler, &me("Alice"));
    assert_eq!(ids(&out), vec!["d1", "f1"]);
    assert_eq!(out[0].stats.likes, 5);
  }

  #[test]
  fn overlay_touches_only_display_fields() {
    let out = project(vec![post("s1", "u1", 2)], Vec::new(), &me("Alicia"));
    let author = &out[0].author;
    assert_eq!(author.handle, "u1");
    assert_eq!(author.name, "Alicia");
    assert_eq!(author.avatar.as_deref(), Some("me.png"));
    assert_eq!(author.status.as_deref(), Some("verified"));
    assert_eq!(out[0].body.as_deref(), Some("hill repeats"));
    assert_eq!(out[0].stats.likes, 2);
  }

  #[test]
  fn other_authors_keep_their_snapshot() {
    let out = project(vec![post("o1", "u2", 0)], Vec::new(), &me("Alicia"));
    assert_eq!(out[0].author.name, "stale name");
  }

  #[test]
  fn for_tribe_filters_by_tribe_id() {
    let mut a = post("a", "u2", 0);
    a.tribe_id = Some("t1".into());
    let mut b = post("b", "u2", 0);
    b.tribe_id = Some("t2".into());
    let c = post("c", "u2", 0);

    assert_eq!(ids(&for_tribe(vec![a, b, c], "t1")), vec!["a"]);
  }

  #[tokio::test]
  async fn promoted_filler_appears_once() {
    let filler_post = post("f1", "u9", 3);
    let generator = vec![FeedItem::Post(filler_post.clone()), FeedItem::Post(post("f2", "u8", 0))];
    let store = Arc::new(PostStore::new(MemoryStorage::new()));
    let feed = Feed::new(store.clone(), generator, me("Alice"));

    store.toggle_like("f1", Some(&filler_post)).await.unwrap();

    let out = feed.assemble(10).await;
    assert_eq!(ids(&out), vec!["f1", "f2"]);
    assert!(out[0].is_liked);
    assert_eq!(out[0].stats.likes, 4);
  }

  #[tokio::test]
  async fn identity_change_is_reflected_immediately() {
    let store = Arc::new(PostStore::new(MemoryStorage::new()));
    store.publish(post("s1", "u1", 0)).await.unwrap();
    let identity = Arc::new(RwLock::new(me("Alice")));
    let feed = Feed::new(store, Vec::<FeedItem>::new(), identity.clone());

    assert_eq!(feed.assemble(0).await[0].author.name, "Alice");

    identity.write().unwrap().name = "Alicia".into();
    let out = feed.assemble(0).await;
    assert_eq!(out[0].author.name, "Alicia");
    assert_eq!(out[0].author.handle, "u1");
  }

  #[tokio::test]
  async fn non_post_items_are_skipped() {
    let generator = vec![
      FeedItem::User(crate::generator::UserCard {
        author:   Author::new("u7", "Gus"),
        bio:      None,
        activity: None,
      }),
      FeedItem::Post(post("f1", "u9", 0)),
    ];
    let feed = Feed::new(Arc::new(PostStore::new(MemoryStorage::new())), generator, me("Alice"));
    assert_eq!(ids(&feed.assemble(2).await), vec!["f1"]);
  }

  #[tokio::test]
  async fn assemble_for_narrows_to_tribe() {
    let mut tribal = post("f1", "u9", 0);
    tribal.tribe_id = Some("t1".into());
    let generator = vec![FeedItem::Post(tribal), FeedItem::Post(post("f2", "u8", 0))];
    let feed = Feed::new(Arc::new(PostStore::new(MemoryStorage::new())), generator, me("Alice"));

    assert_eq!(ids(&feed.assemble_for(2, Some("t1")).await), vec!["f1"]);
    assert_eq!(feed.assemble_for(2, None).await.len(), 2);
  }
}
