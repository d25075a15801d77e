//! Tribe — a community the user can join, request, or create.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
  /// Joining takes effect immediately.
  Public,
  /// Joining files a request that stays pending.
  Private,
}

/// The user's relationship to a tribe. Exactly one holds per tribe id.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
  #[default]
  NonMember,
  Pending,
  Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tribe {
  pub id:           String,
  pub name:         String,
  pub avatar:       Option<String>,
  /// Hex colour used for the tribe's header, e.g. `"#ff6b35"`.
  pub theme_color:  String,
  pub privacy:      Privacy,
  pub member_count: u32,
  /// Display only. The membership store is the authority.
  #[serde(default)]
  pub join_status:  MembershipState,
}

impl Tribe {
  /// A fresh tribe with a random id and no members.
  pub fn new(name: impl Into<String>, privacy: Privacy) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      name: name.into(),
      avatar: None,
      theme_color: "#ff6b35".into(),
      privacy,
      member_count: 0,
      join_status: MembershipState::NonMember,
    }
  }

  pub fn is_private(&self) -> bool { self.privacy == Privacy::Private }
}
