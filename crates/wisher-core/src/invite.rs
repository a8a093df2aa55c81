//! Single-use registration invites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{InviteId, UserId},
  lifecycle::Lifecycle,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
  pub id:         InviteId,
  /// Opaque code handed to the prospective user.
  pub code:       String,
  pub used:       bool,
  /// The user who registered with this code, once used.
  pub used_by:    Option<UserId>,
  pub created_at: DateTime<Utc>,
  pub lifecycle:  Lifecycle,
}

impl Invite {
  pub fn is_consumable(&self) -> bool {
    self.lifecycle.is_live() && !self.used
  }
}
