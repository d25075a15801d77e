//! A deterministic filler generator.
//!
//! Every batch position draws from its own `StdRng`, seeded from the
//! generator seed and the position, so an entry depends only on those two. A filler id printed by
//! `tribe feed` can therefore be resolved again by `tribe like`, whatever
//! batch size produced it.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tribe_core::{
  generator::{ContentGenerator, FeedItem, UserCard},
  post::{Author, Post, PostStats},
  tribe::{Privacy, Tribe},
};

const NAMES: &[&str] = &[
  "Ana Ortiz", "Ben Okafor", "Chloe Park", "Dev Mehta", "Elif Sahin",
  "Femi Adeyemi", "Greta Lind", "Hiro Tanaka",
];

const ACTIVITIES: &[&str] = &[
  "Running", "Cycling", "Yoga", "Climbing", "Swimming", "Lifting",
];

const BODIES: &[&str] = &[
  "Easy 8k along the river this morning.",
  "New PR on the bench today!",
  "Sunrise flow before work, feeling loose.",
  "Hill repeats were brutal but worth it.",
  "First open-water swim of the season.",
  "Recovery day. Foam roller and a long walk.",
];

const TRIBES: &[(&str, &str)] = &[
  ("Dawn Patrol Runners", "#ff6b35"),
  ("Crag Rats", "#2a9d8f"),
  ("Iron Lifters", "#264653"),
  ("Flow State Yoga", "#e9c46a"),
];

/// Fixed origin for filler timestamps so output is reproducible.
const EPOCH: i64 = 1_717_200_000;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
  pool.choose(rng).copied().unwrap_or_default()
}

fn pick_tribe<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
  TRIBES.choose(rng).copied().unwrap_or(("Open Tribe", "#ff6b35"))
}

fn tribe_id(name: &str) -> String { name.to_lowercase().replace(' ', "-") }

#[derive(Debug, Clone, Copy)]
pub struct SeededGenerator {
  seed: u64,
}

impl SeededGenerator {
  pub fn new(seed: u64) -> Self { Self { seed } }

  fn rng(&self, index: usize) -> StdRng {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&self.seed.to_le_bytes());
    key[8..16].copy_from_slice(&(index as u64).to_le_bytes());
    StdRng::from_seed(key)
  }

  fn id_prefix(&self) -> String { format!("filler-{:x}-", self.seed) }

  /// The entry at `index` of every batch. Mostly posts; every fifth entry is
  /// a user card and every seventh a tribe suggestion.
  pub fn item(&self, index: usize) -> FeedItem {
    let mut rng = self.rng(index);
    match index {
      i if i % 7 == 6 => {
        let (name, color) = pick_tribe(&mut rng);
        FeedItem::Tribe(Tribe {
          id: tribe_id(name),
          name: name.to_owned(),
          avatar: None,
          theme_color: color.to_owned(),
          privacy: if rng.gen_bool(0.5) { Privacy::Public } else { Privacy::Private },
          member_count: rng.gen_range(0..5_000),
          join_status: Default::default(),
        })
      }
      i if i % 5 == 4 => FeedItem::User(UserCard {
        author:   author(&mut rng),
        bio:      None,
        activity: Some(pick(&mut rng, ACTIVITIES).to_owned()),
      }),
      _ => FeedItem::Post(self.post(index, &mut rng)),
    }
  }

  fn post(&self, index: usize, rng: &mut StdRng) -> Post {
    let created_at = DateTime::<Utc>::from_timestamp(EPOCH, 0).unwrap_or_default()
      - Duration::hours(index as i64 * 3);
    let author = author(rng);
    let (tribe, _) = pick_tribe(rng);
    Post {
      id: format!("{}{index}", self.id_prefix()),
      author,
      tribe_id: rng.gen_bool(1.0 / 3.0).then(|| tribe_id(tribe)),
      body: Some(pick(rng, BODIES).to_owned()),
      media: Vec::new(),
      activity: Some(pick(rng, ACTIVITIES).to_owned()),
      created_at,
      stats: PostStats { likes: rng.gen_range(0..120) },
      is_liked: false,
      comments: Vec::new(),
    }
  }

  /// Resolve a filler post id this generator issued, regardless of the batch
  /// size it was shown in. Returns `None` for foreign ids and for positions
  /// that hold a user card or tribe.
  pub fn post_by_id(&self, id: &str) -> Option<Post> {
    let index: usize = id.strip_prefix(&self.id_prefix())?.parse().ok()?;
    self.item(index).into_post()
  }
}

fn author<R: Rng + ?Sized>(rng: &mut R) -> Author {
  let name = pick(rng, NAMES);
  let handle = name.split(' ').next().unwrap_or(name).to_lowercase();
  let mut author = Author::new(handle, name);
  author.avatar = Some(format!("https://avatars.example/{}.png", rng.gen_range(0..97)));
  author
}

impl ContentGenerator for SeededGenerator {
  fn generate(&self, count: usize) -> Vec<FeedItem> {
    (0..count).map(|index| self.item(index)).collect()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use tribe_core::{
    posts::{LikeOutcome, PostStore},
    storage::MemoryStorage,
  };

  use super::*;
  use crate::settings::CliConfig;

  #[test]
  fn same_seed_same_output() {
    let a = SeededGenerator::new(42).generate(20);
    let b = SeededGenerator::new(42).generate(20);
    assert_eq!(a, b);
  }

  #[test]
  fn different_seeds_differ() {
    let a = SeededGenerator::new(1).generate(10);
    let b = SeededGenerator::new(2).generate(10);
    assert_ne!(a, b);
  }

  #[test]
  fn respects_count() {
    let g = SeededGenerator::new(1);
    assert!(g.generate(0).is_empty());
    assert_eq!(g.generate(13).len(), 13);
  }

  #[test]
  fn post_ids_unique_within_batch() {
    let posts = FeedItem::posts(SeededGenerator::new(9).generate(50));
    let ids: HashSet<_> = posts.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), posts.len());
    assert!(posts.iter().all(|p| !p.is_liked && p.stats.likes < 120));
  }

  #[test]
  fn prefix_of_a_larger_batch_is_stable() {
    let small = SeededGenerator::new(3).generate(6);
    let large = SeededGenerator::new(3).generate(12);
    assert_eq!(small[..], large[..6]);
  }

  #[test]
  fn foreign_and_non_post_ids_do_not_resolve() {
    let g = SeededGenerator::new(7);
    assert!(g.post_by_id("d1").is_none());
    assert!(g.post_by_id("filler-8-3").is_none());
    assert!(g.post_by_id("filler-7-x").is_none());
    // Index 4 is a user card.
    assert!(g.post_by_id("filler-7-4").is_none());
  }

  #[tokio::test]
  async fn filler_past_the_configured_count_can_be_promoted() {
    let cfg = CliConfig::default();
    let g = SeededGenerator::new(cfg.seed);
    let shown = FeedItem::posts(g.generate(cfg.filler_count + 8));
    let far = shown
      .iter()
      .find(|p| p.id == format!("filler-{:x}-15", cfg.seed))
      .expect("index 15 is a post");
    assert!(cfg.filler_count <= 15);

    let seed = g.post_by_id(&far.id);
    assert_eq!(seed.as_ref(), Some(far));

    let store = PostStore::new(MemoryStorage::new());
    let outcome = store.toggle_like(&far.id, seed.as_ref()).await.unwrap();
    assert!(matches!(outcome, LikeOutcome::Promoted(ref p) if p.id == far.id && p.is_liked));
  }
}
