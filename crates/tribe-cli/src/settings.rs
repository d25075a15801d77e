//! CLI configuration, read from `tribe.toml` and `TRIBE_*` variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use tribe_core::identity::IdentitySnapshot;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
  pub store_path:   PathBuf,
  /// Filler entities requested from the generator per feed.
  pub filler_count: usize,
  /// Generator seed; the same seed reproduces the same filler.
  pub seed:         u64,
  /// The current user's profile.
  pub identity:     IdentitySnapshot,
}

impl Default for CliConfig {
  fn default() -> Self {
    Self {
      store_path:   PathBuf::from("~/.local/share/tribe/posts.sqlite"),
      filler_count: 12,
      seed:         7,
      identity:     IdentitySnapshot {
        handle:        "me".into(),
        name:          "Me".into(),
        avatar:        None,
        status:        None,
        activity:      None,
        activity_icon: None,
      },
    }
  }
}

impl CliConfig {
  /// Layer the optional file at `path` under `TRIBE_*` environment
  /// variables (`TRIBE_IDENTITY__NAME` sets `identity.name`).
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TRIBE").separator("__"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: CliConfig = settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
