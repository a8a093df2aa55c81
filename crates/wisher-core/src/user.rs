//! Users, and the redaction rule applied to every user that leaves the core.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::UserId, lifecycle::Lifecycle};

/// Placeholder written over sensitive fields of redacted users.
pub const REDACTED: &str = "REDACTED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:            UserId,
  pub email:         String,
  /// argon2 PHC string.
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  /// Administrators may issue and revoke invites.
  pub admin:         bool,
  pub created_at:    DateTime<Utc>,
  pub lifecycle:     Lifecycle,
}

impl User {
  /// Blank the e-mail and password hash.
  ///
  /// Applied to every user returned to anyone other than that same user
  /// looking themself up.
  pub fn redacted(mut self) -> Self {
    self.email = REDACTED.to_owned();
    self.password_hash = REDACTED.to_owned();
    self
  }

  /// Return the full record only when `viewer` is this user.
  pub fn visible_to(self, viewer: UserId) -> Self {
    if self.id == viewer { self } else { self.redacted() }
  }

  pub fn is_redacted(&self) -> bool {
    self.email == REDACTED && self.password_hash == REDACTED
  }
}

/// Input to [`crate::store::WishStore::register_user`]. The password is already
/// hashed by the time it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
}

/// A registration request as submitted by a prospective user.
#[derive(Clone, Deserialize)]
pub struct Registration {
  pub email:           String,
  pub password:        String,
  pub password_repeat: String,
  pub first_name:      String,
  pub last_name:       String,
  pub invite_code:     String,
}

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registration")
      .field("email", &self.email)
      .field("first_name", &self.first_name)
      .field("last_name", &self.last_name)
      .field("invite_code", &self.invite_code)
      .finish_non_exhaustive()
  }
}

impl Registration {
  /// Shape checks that need no store access.
  pub fn validate(&self) -> Result<()> {
    if self.password != self.password_repeat {
      return Err(Error::Invalid("passwords must match".into()));
    }
    if self.password.is_empty() {
      return Err(Error::Invalid("password must not be empty".into()));
    }
    let email = self.email.trim();
    if email.is_empty() || !email.contains('@') {
      return Err(Error::Invalid("e-mail address is not valid".into()));
    }
    if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
      return Err(Error::Invalid("first and last name are required".into()));
    }
    if self.invite_code.trim().is_empty() {
      return Err(Error::Invalid("an invitation code is required".into()));
    }
    Ok(())
  }
}
