//! `tribe` — command-line client for the Tribe feed.
//!
//! # Usage
//!
//! ```
//! tribe feed --count 20
//! tribe feed --tribe crag-rats
//! tribe like filler-7-3
//! tribe show filler-7-3
//! ```
//!
//! Filler comes from a seeded generator, so the ids printed by `feed` stay
//! valid for `like` and `show` as long as the seed is unchanged, whatever
//! `--count` produced them. Liking a filler post
//! promotes it into the local store.

mod generator;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tribe_core::{
  feed::Feed,
  post::Post,
  posts::{LikeOutcome, PostEvent, PostStore},
};
use tribe_store_sqlite::SqliteStorage;

use generator::SeededGenerator;
use settings::CliConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tribe", version, about = "Command-line client for the Tribe feed")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tribe.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the assembled feed.
  Feed {
    /// Filler entities to request (default from config).
    #[arg(long)]
    count: Option<usize>,

    /// Only show posts shared into this tribe.
    #[arg(long)]
    tribe: Option<String>,
  },

  /// Toggle the like on a post, promoting filler if needed.
  Like { post_id: String },

  /// Print one post from the assembled feed as JSON.
  Show { post_id: String },
}

// ─── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = CliConfig::load(&cli.config)?;

  if let Some(dir) = cfg.store_path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {dir:?}"))?;
  }
  let storage = SqliteStorage::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  let posts = Arc::new(PostStore::new(storage));
  posts.subscribe(|event: &PostEvent| {
    tracing::info!(
      post_id = %event.post.id,
      kind = ?event.kind,
      likes = event.post.stats.likes,
      "post updated"
    );
  });
  let generator = SeededGenerator::new(cfg.seed);
  let feed = Feed::new(posts, generator, cfg.identity.clone());

  match cli.command {
    Command::Feed { count, tribe } => {
      let count = count.unwrap_or(cfg.filler_count);
      for post in feed.assemble_for(count, tribe.as_deref()).await {
        println!("{}", render(&post));
      }
    }
    Command::Like { post_id } => {
      let seed = generator.post_by_id(&post_id);
      let outcome = feed
        .posts()
        .toggle_like(&post_id, seed.as_ref())
        .await
        .with_context(|| format!("failed to like {post_id}"))?;
      match outcome {
        LikeOutcome::Toggled(post) | LikeOutcome::Promoted(post) => {
          println!("{}", render(&post));
        }
        LikeOutcome::Missed => anyhow::bail!("no post with id {post_id}"),
      }
    }
    Command::Show { post_id } => {
      let post = feed
        .assemble(cfg.filler_count)
        .await
        .into_iter()
        .find(|p| p.id == post_id)
        .or_else(|| generator.post_by_id(&post_id))
        .with_context(|| format!("no post with id {post_id}"))?;
      println!("{}", serde_json::to_string_pretty(&post)?);
    }
  }

  Ok(())
}

/// One line per post: id, author, likes (`*` when liked), body.
fn render(post: &Post) -> String {
  format!(
    "{:<20} @{:<10} {:<16} {:>4}{} {}",
    post.id,
    post.author.handle,
    post.author.name,
    post.stats.likes,
    if post.is_liked { "*" } else { " " },
    post.body.as_deref().unwrap_or(""),
  )
}
