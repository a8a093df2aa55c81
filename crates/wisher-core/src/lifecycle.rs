//! Soft-delete lifecycle shared by every entity.
//!
//! Rows are never removed. A row is either [`Lifecycle::Live`] or
//! [`Lifecycle::Disabled`]; the transition is one-way and stamps the moment it
//! happened. Only the state is consulted for filtering, never the timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
  Error, Result,
  error::Conflict,
  store::WishStore,
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
  Live,
  Disabled {
    /// When the row was disabled. Audit only.
    at: DateTime<Utc>,
  },
}

impl Lifecycle {
  pub fn is_live(&self) -> bool { matches!(self, Self::Live) }
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Every kind of row the store holds; used for generic disable and for error
/// reporting.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr,
  Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  User,
  Invite,
  Group,
  GroupMembership,
  Wishlist,
  WishlistMembership,
  Wish,
  WishClaim,
}

// ─── Disable ─────────────────────────────────────────────────────────────────

/// Flip a live row to disabled, distinguishing every way that can fail.
///
/// The store performs a conditional update and reports how many rows changed.
/// Zero rows means the row is either absent or already disabled; an
/// unfiltered lookup by id tells which.
pub async fn disable<S>(store: &S, kind: EntityKind, id: i64) -> Result<()>
where
  S: WishStore,
{
  let changed = store.disable(kind, id).await.map_err(Error::store)?;
  match changed {
    1 => Ok(()),
    0 => match store.lifecycle(kind, id).await.map_err(Error::store)? {
      None => Err(Error::not_found(kind, id)),
      Some(Lifecycle::Disabled { .. }) => {
        Err(Conflict::AlreadyDisabled { kind, id }.into())
      }
      Some(Lifecycle::Live) => Err(Error::Store(
        format!("{kind} {id} stayed live after a disable").into(),
      )),
    },
    n => Err(Error::Store(
      format!("disabling {kind} {id} changed {n} rows").into(),
    )),
  }
}
