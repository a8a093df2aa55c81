//! Error types for `wisher-core`.
//!
//! The taxonomy mirrors what a request layer needs to pick a status: absent
//! targets, present-but-forbidden targets, conflicts, and store failures are
//! never folded into one another.

use thiserror::Error;

use crate::lifecycle::EntityKind;

/// Why a write was refused because of existing state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
  #[error("e-mail is already in use")]
  EmailInUse,

  #[error("a wishlist with that name already exists")]
  WishlistNameTaken,

  #[error("a wish with that name already exists on this wishlist")]
  WishNameTaken,

  #[error("wish is already claimed")]
  AlreadyClaimed,

  #[error("wish is not claimed")]
  NotClaimed,

  #[error("invitation code is not valid")]
  InvalidInvite,

  #[error("user is already a member of this group")]
  AlreadyMember,

  #[error("wishlist is already shared with this group")]
  AlreadyShared,

  #[error("{kind} {id} is already disabled")]
  AlreadyDisabled { kind: EntityKind, id: i64 },
}

#[derive(Debug, Error)]
pub enum Error {
  /// The target is absent or disabled; callers cannot tell the two apart.
  #[error("{kind} {id} not found")]
  NotFound { kind: EntityKind, id: i64 },

  /// The target exists but the acting user fails the relevant check.
  #[error("not authorized: {0}")]
  Unauthorized(String),

  #[error("conflict: {0}")]
  Conflict(#[from] Conflict),

  #[error("invalid input: {0}")]
  Invalid(String),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("password hashing error: {0}")]
  Password(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure. Store errors are surfaced as-is, never retried.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub(crate) fn not_found(kind: EntityKind, id: impl Into<i64>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }

  pub(crate) fn unauthorized(kind: EntityKind, id: impl Into<i64>) -> Self {
    Self::Unauthorized(format!("{kind} {}", id.into()))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
