//! Integration tests for `SqliteStorage`, alone and under a `PostStore`.

use tribe_core::{
  Error as CoreError,
  post::{Author, Post},
  posts::{DEFAULT_POSTS_KEY, LikeOutcome, PostStore},
  storage::BlobStorage,
};
use uuid::Uuid;

use crate::SqliteStorage;

async fn storage() -> SqliteStorage {
  SqliteStorage::open_in_memory()
    .await
    .expect("in-memory store")
}

fn post(id: &str, likes: u32) -> Post {
  let mut p = Post::new(id, Author::new("u1", "Una"), "tempo run");
  p.stats.likes = likes;
  p
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn read_missing_key_returns_none() {
  let s = storage().await;
  assert!(s.read("posts").await.unwrap().is_none());
}

#[tokio::test]
async fn write_then_read() {
  let s = storage().await;
  s.write("posts", b"[1,2,3]".to_vec()).await.unwrap();
  assert_eq!(s.read("posts").await.unwrap().as_deref(), Some(&b"[1,2,3]"[..]));
}

#[tokio::test]
async fn write_replaces_previous_value() {
  let s = storage().await;
  s.write("posts", b"old".to_vec()).await.unwrap();
  s.write("posts", b"new".to_vec()).await.unwrap();
  assert_eq!(s.read("posts").await.unwrap().as_deref(), Some(&b"new"[..]));
}

#[tokio::test]
async fn keys_are_independent() {
  let s = storage().await;
  s.write("a", b"1".to_vec()).await.unwrap();
  s.write("b", b"2".to_vec()).await.unwrap();
  assert_eq!(s.read("a").await.unwrap().as_deref(), Some(&b"1"[..]));
  assert_eq!(s.read("b").await.unwrap().as_deref(), Some(&b"2"[..]));
}

// ─── Post store on SQLite ────────────────────────────────────────────────────

#[tokio::test]
async fn post_store_persists_likes() {
  let store = PostStore::new(storage().await);
  store.publish(post("d1", 5)).await.unwrap();

  store.toggle_like("d1", None).await.unwrap();
  let stored = store.get("d1").await.unwrap();
  assert!(stored.is_liked);
  assert_eq!(stored.stats.likes, 6);
}

#[tokio::test]
async fn corrupt_blob_is_served_empty_and_left_alone() {
  let s = storage().await;
  s.write(DEFAULT_POSTS_KEY, b"\xff\xfe garbage".to_vec()).await.unwrap();
  let store = PostStore::new(s.clone());

  assert!(store.load().await.is_empty());
  let err = store.publish(post("d1", 0)).await.unwrap_err();
  assert!(matches!(err, CoreError::StorageRead(_)));
  assert_eq!(
    s.read(DEFAULT_POSTS_KEY).await.unwrap().as_deref(),
    Some(&b"\xff\xfe garbage"[..]),
  );
}

#[tokio::test]
async fn promoted_post_survives_reopen() {
  let path = std::env::temp_dir().join(format!("tribe-{}.sqlite", Uuid::new_v4()));

  let filler = post("f1", 2);
  {
    let store = PostStore::new(SqliteStorage::open(&path).await.unwrap());
    let outcome = store.toggle_like("f1", Some(&filler)).await.unwrap();
    assert!(matches!(outcome, LikeOutcome::Promoted(_)));
  }

  let reopened = PostStore::new(SqliteStorage::open(&path).await.unwrap());
  let posts = reopened.load().await;
  assert_eq!(posts, vec![filler.promoted()]);

  let _ = std::fs::remove_file(&path);
}
