//! [`MembershipStore`] — which tribes the user belongs to, has requested, and
//! has selected.
//!
//! Held in memory only. A tribe id is never in both the member and pending
//! sets, and the selection, when set, always names a member.
//!
//! Private tribes stay [`Pending`](MembershipState::Pending) once requested;
//! no approval transition exists.

use std::{
  collections::BTreeMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use crate::{
  listeners::{Listeners, Subscription},
  tribe::{MembershipState, Privacy, Tribe},
};

/// Delivered to subscribers after each mutation that changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
  Joined(Tribe),
  Requested(Tribe),
  Left { tribe_id: String, cleared_selection: bool },
  Selected(Option<String>),
  Created(Tribe),
}

#[derive(Debug, Default)]
struct Sets {
  members:  BTreeMap<String, Tribe>,
  pending:  BTreeMap<String, Tribe>,
  selected: Option<String>,
}

impl Sets {
  fn state(&self, tribe_id: &str) -> MembershipState {
    if self.members.contains_key(tribe_id) {
      MembershipState::Member
    } else if self.pending.contains_key(tribe_id) {
      MembershipState::Pending
    } else {
      MembershipState::NonMember
    }
  }

  fn admit(&mut self, mut tribe: Tribe) -> Tribe {
    tribe.join_status = MembershipState::Member;
    self.pending.remove(&tribe.id);
    self.members.insert(tribe.id.clone(), tribe.clone());
    tribe
  }
}

#[derive(Default)]
pub struct MembershipStore {
  sets:      Mutex<Sets>,
  listeners: Listeners<MembershipEvent>,
}

impl MembershipStore {
  pub fn new() -> Self { Self::default() }

  fn sets(&self) -> MutexGuard<'_, Sets> {
    self.sets.lock().unwrap_or_else(PoisonError::into_inner)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub fn state(&self, tribe_id: &str) -> MembershipState { self.sets().state(tribe_id) }

  pub fn is_member(&self, tribe_id: &str) -> bool {
    self.sets().members.contains_key(tribe_id)
  }

  pub fn is_requested(&self, tribe_id: &str) -> bool {
    self.sets().pending.contains_key(tribe_id)
  }

  /// The selected tribe, if any.
  pub fn selected(&self) -> Option<Tribe> {
    let sets = self.sets();
    sets.selected.as_ref().and_then(|id| sets.members.get(id)).cloned()
  }

  /// Member tribes, ordered by id.
  pub fn members(&self) -> Vec<Tribe> { self.sets().members.values().cloned().collect() }

  /// Requested tribes, ordered by id.
  pub fn pending(&self) -> Vec<Tribe> { self.sets().pending.values().cloned().collect() }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Join a public tribe or request a private one. Returns the resulting
  /// state; repeating a join is a no-op.
  pub fn join(&self, mut tribe: Tribe) -> MembershipState {
    let event = {
      let mut sets = self.sets();
      match (sets.state(&tribe.id), tribe.privacy) {
        (MembershipState::Member, _) => return MembershipState::Member,
        (MembershipState::Pending, Privacy::Private) => return MembershipState::Pending,
        (_, Privacy::Public) => MembershipEvent::Joined(sets.admit(tribe)),
        (MembershipState::NonMember, Privacy::Private) => {
          tribe.join_status = MembershipState::Pending;
          sets.pending.insert(tribe.id.clone(), tribe.clone());
          MembershipEvent::Requested(tribe)
        }
      }
    };

    let state = match event {
      MembershipEvent::Joined(_) => MembershipState::Member,
      _ => MembershipState::Pending,
    };
    debug!(?event, "tribe join");
    self.listeners.emit(&event);
    state
  }

  /// Drop membership and any pending request for `tribe_id`, clearing the
  /// selection if it pointed there. Returns whether anything changed.
  pub fn leave(&self, tribe_id: &str) -> bool {
    let event = {
      let mut sets = self.sets();
      let was_member = sets.members.remove(tribe_id).is_some();
      let was_pending = sets.pending.remove(tribe_id).is_some();
      let cleared_selection = sets.selected.as_deref() == Some(tribe_id);
      if cleared_selection {
        sets.selected = None;
      }
      if !(was_member || was_pending || cleared_selection) {
        return false;
      }
      MembershipEvent::Left { tribe_id: tribe_id.to_owned(), cleared_selection }
    };

    debug!(?event, "tribe leave");
    self.listeners.emit(&event);
    true
  }

  /// Select a member tribe, or clear the selection with `None`. Selecting a
  /// tribe the user is not a member of is ignored and returns `false`.
  pub fn select(&self, tribe_id: Option<&str>) -> bool {
    let event = {
      let mut sets = self.sets();
      if let Some(id) = tribe_id
        && !sets.members.contains_key(id)
      {
        return false;
      }
      if sets.selected.as_deref() == tribe_id {
        return true;
      }
      sets.selected = tribe_id.map(str::to_owned);
      MembershipEvent::Selected(sets.selected.clone())
    };

    self.listeners.emit(&event);
    true
  }

  /// Add a newly created tribe as a member and select it, bypassing the join
  /// flow.
  pub fn create_tribe(&self, tribe: Tribe) -> Tribe {
    let tribe = {
      let mut sets = self.sets();
      let tribe = sets.admit(tribe);
      sets.selected = Some(tribe.id.clone());
      tribe
    };

    debug!(tribe_id = %tribe.id, "tribe created");
    self.listeners.emit(&MembershipEvent::Created(tribe.clone()));
    tribe
  }

  // ── Notification ──────────────────────────────────────────────────────────

  pub fn subscribe(
    &self,
    listener: impl Fn(&MembershipEvent) + Send + Sync + 'static,
  ) -> Subscription<MembershipEvent> {
    self.listeners.subscribe(listener)
  }
}
