//! Core types and stores for the Tribe feed client.
//!
//! Two stores live here: the [`PostStore`](posts::PostStore), which caches
//! user-authored posts in an opaque blob storage, and the
//! [`MembershipStore`](membership::MembershipStore), which tracks the tribes
//! the current user belongs to. The [`feed`] module merges durable posts with
//! synthetic filler into the single view every screen displays.
//!
//! This crate is free of database and UI dependencies. Storage backends
//! implement [`BlobStorage`](storage::BlobStorage).

// Native `async fn` in traits; the `Send` bounds are spelled out explicitly.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod feed;
pub mod generator;
pub mod identity;
pub mod listeners;
pub mod membership;
pub mod post;
pub mod posts;
pub mod storage;
pub mod tribe;

pub use error::{Error, Result};
