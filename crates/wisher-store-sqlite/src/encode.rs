//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The lifecycle is split over
//! two columns, `enabled` and `disabled_at`. Each `Raw*` struct mirrors one
//! table row in the column order of its `*_COLUMNS` constant.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use wisher_core::{
  group::{Group, GroupMembership},
  id::{
    GroupId, GroupMembershipId, InviteId, UserId, WishClaimId, WishId,
    WishlistId, WishlistMembershipId,
  },
  invite::Invite,
  lifecycle::Lifecycle,
  user::User,
  wish::{Wish, WishClaim},
  wishlist::{Wishlist, WishlistMembership},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

pub fn decode_lifecycle(
  enabled: bool,
  disabled_at: Option<&str>,
) -> Result<Lifecycle> {
  match (enabled, disabled_at) {
    (true, _) => Ok(Lifecycle::Live),
    (false, Some(at)) => Ok(Lifecycle::Disabled { at: decode_dt(at)? }),
    (false, None) => {
      Err(Error::Decode("disabled row has no disabled_at".into()))
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, email, password_hash, first_name, \
                                last_name, admin, created_at, enabled, \
                                disabled_at";

pub struct RawUser {
  pub id:            i64,
  pub email:         String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub admin:         bool,
  pub created_at:    String,
  pub enabled:       bool,
  pub disabled_at:   Option<String>,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      first_name:    row.get(3)?,
      last_name:     row.get(4)?,
      admin:         row.get(5)?,
      created_at:    row.get(6)?,
      enabled:       row.get(7)?,
      disabled_at:   row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            UserId(self.id),
      email:         self.email,
      password_hash: self.password_hash,
      first_name:    self.first_name,
      last_name:     self.last_name,
      admin:         self.admin,
      created_at:    decode_dt(&self.created_at)?,
      lifecycle:     decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const INVITE_COLUMNS: &str =
  "id, code, used, used_by, created_at, enabled, disabled_at";

pub struct RawInvite {
  pub id:          i64,
  pub code:        String,
  pub used:        bool,
  pub used_by:     Option<i64>,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawInvite {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      code:        row.get(1)?,
      used:        row.get(2)?,
      used_by:     row.get(3)?,
      created_at:  row.get(4)?,
      enabled:     row.get(5)?,
      disabled_at: row.get(6)?,
    })
  }

  pub fn into_invite(self) -> Result<Invite> {
    Ok(Invite {
      id:         InviteId(self.id),
      code:       self.code,
      used:       self.used,
      used_by:    self.used_by.map(UserId),
      created_at: decode_dt(&self.created_at)?,
      lifecycle:  decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const GROUP_COLUMNS: &str =
  "id, owner_id, name, description, created_at, enabled, disabled_at";

pub struct RawGroup {
  pub id:          i64,
  pub owner_id:    i64,
  pub name:        String,
  pub description: String,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawGroup {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      owner_id:    row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
      enabled:     row.get(5)?,
      disabled_at: row.get(6)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      id:          GroupId(self.id),
      owner:       UserId(self.owner_id),
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      lifecycle:   decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const GROUP_MEMBERSHIP_COLUMNS: &str =
  "id, group_id, user_id, created_at, enabled, disabled_at";

pub struct RawGroupMembership {
  pub id:          i64,
  pub group_id:    i64,
  pub user_id:     i64,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawGroupMembership {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      group_id:    row.get(1)?,
      user_id:     row.get(2)?,
      created_at:  row.get(3)?,
      enabled:     row.get(4)?,
      disabled_at: row.get(5)?,
    })
  }

  pub fn into_membership(self) -> Result<GroupMembership> {
    Ok(GroupMembership {
      id:         GroupMembershipId(self.id),
      group:      GroupId(self.group_id),
      member:     UserId(self.user_id),
      created_at: decode_dt(&self.created_at)?,
      lifecycle:  decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const WISHLIST_COLUMNS: &str =
  "id, owner_id, name, description, created_at, enabled, disabled_at";

pub struct RawWishlist {
  pub id:          i64,
  pub owner_id:    i64,
  pub name:        String,
  pub description: String,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawWishlist {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      owner_id:    row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
      enabled:     row.get(5)?,
      disabled_at: row.get(6)?,
    })
  }

  pub fn into_wishlist(self) -> Result<Wishlist> {
    Ok(Wishlist {
      id:          WishlistId(self.id),
      owner:       UserId(self.owner_id),
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      lifecycle:   decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const WISHLIST_MEMBERSHIP_COLUMNS: &str =
  "id, wishlist_id, group_id, created_at, enabled, disabled_at";

pub struct RawWishlistMembership {
  pub id:          i64,
  pub wishlist_id: i64,
  pub group_id:    i64,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawWishlistMembership {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      wishlist_id: row.get(1)?,
      group_id:    row.get(2)?,
      created_at:  row.get(3)?,
      enabled:     row.get(4)?,
      disabled_at: row.get(5)?,
    })
  }

  pub fn into_membership(self) -> Result<WishlistMembership> {
    Ok(WishlistMembership {
      id:         WishlistMembershipId(self.id),
      wishlist:   WishlistId(self.wishlist_id),
      group:      GroupId(self.group_id),
      created_at: decode_dt(&self.created_at)?,
      lifecycle:  decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const WISH_COLUMNS: &str = "id, wishlist_id, owner_id, name, note, url, \
                                created_at, enabled, disabled_at";

pub struct RawWish {
  pub id:          i64,
  pub wishlist_id: i64,
  pub owner_id:    i64,
  pub name:        String,
  pub note:        String,
  pub url:         String,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawWish {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      wishlist_id: row.get(1)?,
      owner_id:    row.get(2)?,
      name:        row.get(3)?,
      note:        row.get(4)?,
      url:         row.get(5)?,
      created_at:  row.get(6)?,
      enabled:     row.get(7)?,
      disabled_at: row.get(8)?,
    })
  }

  pub fn into_wish(self) -> Result<Wish> {
    Ok(Wish {
      id:         WishId(self.id),
      wishlist:   WishlistId(self.wishlist_id),
      owner:      UserId(self.owner_id),
      name:       self.name,
      note:       self.note,
      url:        self.url,
      created_at: decode_dt(&self.created_at)?,
      lifecycle:  decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}

pub const CLAIM_COLUMNS: &str =
  "id, wish_id, user_id, created_at, enabled, disabled_at";

pub struct RawClaim {
  pub id:          i64,
  pub wish_id:     i64,
  pub user_id:     i64,
  pub created_at:  String,
  pub enabled:     bool,
  pub disabled_at: Option<String>,
}

impl RawClaim {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      wish_id:     row.get(1)?,
      user_id:     row.get(2)?,
      created_at:  row.get(3)?,
      enabled:     row.get(4)?,
      disabled_at: row.get(5)?,
    })
  }

  pub fn into_claim(self) -> Result<WishClaim> {
    Ok(WishClaim {
      id:         WishClaimId(self.id),
      wish:       WishId(self.wish_id),
      user:       UserId(self.user_id),
      created_at: decode_dt(&self.created_at)?,
      lifecycle:  decode_lifecycle(self.enabled, self.disabled_at.as_deref())?,
    })
  }
}
