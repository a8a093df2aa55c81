//! [`SqliteStore`]: the SQLite implementation of [`WishStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use wisher_core::{
  group::{Group, GroupMembership, NewGroup},
  id::{
    GroupId, GroupMembershipId, InviteId, UserId, WishClaimId, WishId,
    WishlistId, WishlistMembershipId,
  },
  invite::Invite,
  lifecycle::{EntityKind, Lifecycle},
  store::{RegisterOutcome, WishStore},
  user::{NewUser, User},
  wish::{NewWish, Wish, WishClaim},
  wishlist::{Wishlist, WishlistMembership},
};

use crate::{
  Error, Result,
  encode::{
    CLAIM_COLUMNS, GROUP_COLUMNS, GROUP_MEMBERSHIP_COLUMNS, INVITE_COLUMNS,
    RawClaim, RawGroup, RawGroupMembership, RawInvite, RawUser, RawWish,
    RawWishlist, RawWishlistMembership, USER_COLUMNS, WISH_COLUMNS,
    WISHLIST_COLUMNS, WISHLIST_MEMBERSHIP_COLUMNS, decode_lifecycle, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn table(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::User => "users",
    EntityKind::Invite => "invites",
    EntityKind::Group => "user_groups",
    EntityKind::GroupMembership => "group_memberships",
    EntityKind::Wishlist => "wishlists",
    EntityKind::WishlistMembership => "wishlist_memberships",
    EntityKind::Wish => "wishes",
    EntityKind::WishClaim => "wish_claims",
  }
}

/// Whether `err` is a violation of a `UNIQUE` constraint or index.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Run an insert, turning a uniqueness collision into `Ok(None)` and anything
/// else into the rowid of the new row.
fn insert_unique(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Option<i64>> {
  match conn.execute(sql, params) {
    Ok(_) => Ok(Some(conn.last_insert_rowid())),
    Err(e) if is_unique_violation(&e) => Ok(None),
    Err(e) => Err(e),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Wisher store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }

  async fn count(&self, sql: &'static str, a: i64, b: String) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, rusqlite::params![a, b], |r| r.get(0))?)
      })
      .await?;
    usize::try_from(count).map_err(|e| Error::Decode(e.to_string()))
  }

  async fn exists(&self, sql: &'static str, a: i64, b: i64) -> Result<bool> {
    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, rusqlite::params![a, b], |r| r.get(0))?)
      })
      .await?;
    Ok(found)
  }
}

// ─── WishStore impl ──────────────────────────────────────────────────────────

impl WishStore for SqliteStore {
  type Error = Error;

  // ── Any kind ──────────────────────────────────────────────────────────────

  async fn disable(&self, kind: EntityKind, id: i64) -> Result<usize> {
    let sql = format!(
      "UPDATE {} SET enabled = 0, disabled_at = ?1 WHERE id = ?2 AND enabled = 1",
      table(kind)
    );
    let at = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![at, id])?))
      .await?;
    Ok(changed)
  }

  async fn lifecycle(&self, kind: EntityKind, id: i64) -> Result<Option<Lifecycle>> {
    let sql = format!("SELECT enabled, disabled_at FROM {} WHERE id = ?1", table(kind));

    let raw: Option<(bool, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id], |r| Ok((r.get(0)?, r.get(1)?)))
          .optional()?)
      })
      .await?;

    raw
      .map(|(enabled, at)| decode_lifecycle(enabled, at.as_deref()))
      .transpose()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(
    &self,
    user: NewUser,
    invite_code: String,
  ) -> Result<RegisterOutcome> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let email = user.email.clone();
    let password_hash = user.password_hash.clone();
    let first_name = user.first_name.clone();
    let last_name = user.last_name.clone();

    let id: std::result::Result<i64, RegisterOutcome> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let consumed = tx.execute(
          "UPDATE invites SET used = 1
           WHERE code = ?1 AND used = 0 AND enabled = 1",
          rusqlite::params![invite_code],
        )?;
        if consumed != 1 {
          return Ok(Err(RegisterOutcome::InvalidInvite));
        }

        let Some(id) = insert_unique(
          &tx,
          "INSERT INTO users (email, password_hash, first_name, last_name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![email, password_hash, first_name, last_name, at_str],
        )?
        else {
          return Ok(Err(RegisterOutcome::EmailTaken));
        };

        tx.execute(
          "UPDATE invites SET used_by = ?1 WHERE code = ?2",
          rusqlite::params![id, invite_code],
        )?;
        tx.commit()?;
        Ok(Ok(id))
      })
      .await?;

    Ok(match id {
      Ok(id) => RegisterOutcome::Registered(User {
        id: UserId(id),
        email: user.email,
        password_hash: user.password_hash,
        first_name: user.first_name,
        last_name: user.last_name,
        admin: false,
        created_at,
        lifecycle: Lifecycle::Live,
      }),
      Err(outcome) => outcome,
    })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND enabled = 1"),
            rusqlite::params![id.0],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_record(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id.0],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 AND enabled = 1"
            ),
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE enabled = 1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn set_user_admin(&self, id: UserId, admin: bool) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET admin = ?1 WHERE id = ?2 AND enabled = 1",
          rusqlite::params![admin, id.0],
        )?)
      })
      .await?;
    Ok(changed)
  }

  // ── Invites ───────────────────────────────────────────────────────────────

  async fn insert_invite(&self, code: String) -> Result<Option<Invite>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let code_str = code.clone();

    let id = self
      .conn
      .call(move |conn| {
        Ok(insert_unique(
          conn,
          "INSERT INTO invites (code, created_at) VALUES (?1, ?2)",
          rusqlite::params![code_str, at_str],
        )?)
      })
      .await?;

    Ok(id.map(|id| Invite {
      id: InviteId(id),
      code,
      used: false,
      used_by: None,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn list_invites(&self) -> Result<Vec<Invite>> {
    let raws: Vec<RawInvite> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INVITE_COLUMNS} FROM invites WHERE enabled = 1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawInvite::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvite::into_invite).collect()
  }

  async fn count_consumable_invites(&self, code: String) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM invites WHERE code = ?1 AND used = 0 AND enabled = 1",
          rusqlite::params![code],
          |r| r.get(0),
        )?)
      })
      .await?;
    usize::try_from(count).map_err(|e| Error::Decode(e.to_string()))
  }

  async fn consume_invite(&self, code: String) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE invites SET used = 1 WHERE code = ?1 AND used = 0 AND enabled = 1",
          rusqlite::params![code],
        )?)
      })
      .await?;
    Ok(changed)
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn insert_group(&self, owner: UserId, group: NewGroup) -> Result<Group> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name = group.name.clone();
    let description = group.description.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO user_groups (owner_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![owner.0, name, description, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
          "INSERT INTO group_memberships (group_id, user_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id, owner.0, at_str],
        )?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(Group {
      id: GroupId(id),
      owner,
      name: group.name,
      description: group.description,
      created_at,
      lifecycle: Lifecycle::Live,
    })
  }

  async fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {GROUP_COLUMNS} FROM user_groups WHERE id = ?1 AND enabled = 1"
            ),
            rusqlite::params![id.0],
            RawGroup::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn list_groups_for_member(&self, member: UserId) -> Result<Vec<Group>> {
    let raws: Vec<RawGroup> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GROUP_COLUMNS} FROM user_groups
           WHERE enabled = 1
             AND id IN (
               SELECT group_id FROM group_memberships
               WHERE user_id = ?1 AND enabled = 1
             )
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![member.0], RawGroup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGroup::into_group).collect()
  }

  async fn insert_group_membership(
    &self,
    group: GroupId,
    member: UserId,
  ) -> Result<Option<GroupMembership>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken: bool = tx.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM group_memberships
             WHERE group_id = ?1 AND user_id = ?2 AND enabled = 1
           )",
          rusqlite::params![group.0, member.0],
          |r| r.get(0),
        )?;
        if taken {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO group_memberships (group_id, user_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![group.0, member.0, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    Ok(id.map(|id| GroupMembership {
      id: GroupMembershipId(id),
      group,
      member,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn get_group_membership(
    &self,
    id: GroupMembershipId,
  ) -> Result<Option<GroupMembership>> {
    let raw: Option<RawGroupMembership> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {GROUP_MEMBERSHIP_COLUMNS} FROM group_memberships
               WHERE id = ?1 AND enabled = 1"
            ),
            rusqlite::params![id.0],
            RawGroupMembership::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroupMembership::into_membership).transpose()
  }

  async fn list_group_memberships(
    &self,
    group: GroupId,
  ) -> Result<Vec<GroupMembership>> {
    let raws: Vec<RawGroupMembership> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GROUP_MEMBERSHIP_COLUMNS} FROM group_memberships
           WHERE group_id = ?1
             AND enabled = 1
             AND user_id IN (SELECT id FROM users WHERE enabled = 1)
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![group.0], RawGroupMembership::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawGroupMembership::into_membership)
      .collect()
  }

  async fn has_group_membership(&self, group: GroupId, member: UserId) -> Result<bool> {
    self
      .exists(
        "SELECT EXISTS(
           SELECT 1 FROM group_memberships
           WHERE group_id = ?1 AND user_id = ?2 AND enabled = 1
         )",
        group.0,
        member.0,
      )
      .await
  }

  // ── Wishlists ─────────────────────────────────────────────────────────────

  async fn count_live_wishlists_named(
    &self,
    owner: UserId,
    name: String,
  ) -> Result<usize> {
    self
      .count(
        "SELECT COUNT(*) FROM wishlists
         WHERE owner_id = ?1 AND name = ?2 AND enabled = 1",
        owner.0,
        name,
      )
      .await
  }

  async fn insert_wishlist(
    &self,
    owner: UserId,
    name: String,
    description: String,
    groups: Vec<GroupId>,
  ) -> Result<Option<Wishlist>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name_str = name.clone();
    let description_str = description.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(id) = insert_unique(
          &tx,
          "INSERT INTO wishlists (owner_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![owner.0, name_str, description_str, at_str],
        )?
        else {
          return Ok(None);
        };
        for group in &groups {
          tx.execute(
            "INSERT INTO wishlist_memberships (wishlist_id, group_id, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![id, group.0, at_str],
          )?;
        }
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    Ok(id.map(|id| Wishlist {
      id: WishlistId(id),
      owner,
      name,
      description,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn get_wishlist(&self, id: WishlistId) -> Result<Option<Wishlist>> {
    let raw: Option<RawWishlist> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE id = ?1 AND enabled = 1"
            ),
            rusqlite::params![id.0],
            RawWishlist::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawWishlist::into_wishlist).transpose()
  }

  async fn list_wishlists_by_owner(&self, owner: UserId) -> Result<Vec<Wishlist>> {
    let raws: Vec<RawWishlist> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WISHLIST_COLUMNS} FROM wishlists
           WHERE owner_id = ?1 AND enabled = 1
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner.0], RawWishlist::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWishlist::into_wishlist).collect()
  }

  async fn list_wishlists_for_group(&self, group: GroupId) -> Result<Vec<Wishlist>> {
    let raws: Vec<RawWishlist> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WISHLIST_COLUMNS} FROM wishlists
           WHERE enabled = 1
             AND id IN (
               SELECT wishlist_id FROM wishlist_memberships
               WHERE group_id = ?1 AND enabled = 1
             )
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![group.0], RawWishlist::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWishlist::into_wishlist).collect()
  }

  async fn insert_wishlist_membership(
    &self,
    wishlist: WishlistId,
    group: GroupId,
  ) -> Result<Option<WishlistMembership>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken: bool = tx.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM wishlist_memberships
             WHERE wishlist_id = ?1 AND group_id = ?2 AND enabled = 1
           )",
          rusqlite::params![wishlist.0, group.0],
          |r| r.get(0),
        )?;
        if taken {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO wishlist_memberships (wishlist_id, group_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![wishlist.0, group.0, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    Ok(id.map(|id| WishlistMembership {
      id: WishlistMembershipId(id),
      wishlist,
      group,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn get_wishlist_membership(
    &self,
    id: WishlistMembershipId,
  ) -> Result<Option<WishlistMembership>> {
    let raw: Option<RawWishlistMembership> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {WISHLIST_MEMBERSHIP_COLUMNS} FROM wishlist_memberships
               WHERE id = ?1 AND enabled = 1"
            ),
            rusqlite::params![id.0],
            RawWishlistMembership::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawWishlistMembership::into_membership).transpose()
  }

  async fn list_wishlist_memberships(
    &self,
    wishlist: WishlistId,
  ) -> Result<Vec<WishlistMembership>> {
    let raws: Vec<RawWishlistMembership> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WISHLIST_MEMBERSHIP_COLUMNS} FROM wishlist_memberships
           WHERE wishlist_id = ?1
             AND enabled = 1
             AND group_id IN (SELECT id FROM user_groups WHERE enabled = 1)
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![wishlist.0], RawWishlistMembership::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawWishlistMembership::into_membership)
      .collect()
  }

  async fn has_wishlist_membership(
    &self,
    group: GroupId,
    wishlist: WishlistId,
  ) -> Result<bool> {
    self
      .exists(
        "SELECT EXISTS(
           SELECT 1 FROM wishlist_memberships
           WHERE group_id = ?1 AND wishlist_id = ?2 AND enabled = 1
         )",
        group.0,
        wishlist.0,
      )
      .await
  }

  async fn has_wishlist_access_via_group(
    &self,
    user: UserId,
    wishlist: WishlistId,
  ) -> Result<bool> {
    self
      .exists(
        "SELECT EXISTS(
           SELECT 1
           FROM group_memberships gm
           JOIN user_groups g           ON g.id = gm.group_id
           JOIN wishlist_memberships wm ON wm.group_id = g.id
           WHERE gm.user_id = ?1
             AND wm.wishlist_id = ?2
             AND gm.enabled = 1
             AND g.enabled  = 1
             AND wm.enabled = 1
         )",
        user.0,
        wishlist.0,
      )
      .await
  }

  async fn list_wishlist_members(&self, wishlist: WishlistId) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE enabled = 1
             AND id != (SELECT owner_id FROM wishlists WHERE id = ?1)
             AND id IN (
               SELECT gm.user_id
               FROM group_memberships gm
               JOIN user_groups g           ON g.id = gm.group_id
               JOIN wishlist_memberships wm ON wm.group_id = g.id
               WHERE wm.wishlist_id = ?1
                 AND gm.enabled = 1
                 AND g.enabled  = 1
                 AND wm.enabled = 1
             )
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![wishlist.0], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Wishes ────────────────────────────────────────────────────────────────

  async fn count_live_wishes_named(
    &self,
    wishlist: WishlistId,
    name: String,
  ) -> Result<usize> {
    self
      .count(
        "SELECT COUNT(*) FROM wishes
         WHERE wishlist_id = ?1 AND name = ?2 AND enabled = 1",
        wishlist.0,
        name,
      )
      .await
  }

  async fn insert_wish(
    &self,
    wishlist: WishlistId,
    owner: UserId,
    wish: NewWish,
  ) -> Result<Option<Wish>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name = wish.name.clone();
    let note = wish.note.clone();
    let url = wish.url.clone();

    let id = self
      .conn
      .call(move |conn| {
        Ok(insert_unique(
          conn,
          "INSERT INTO wishes (wishlist_id, owner_id, name, note, url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![wishlist.0, owner.0, name, note, url, at_str],
        )?)
      })
      .await?;

    Ok(id.map(|id| Wish {
      id: WishId(id),
      wishlist,
      owner,
      name: wish.name,
      note: wish.note,
      url: wish.url,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn get_wish(&self, id: WishId) -> Result<Option<Wish>> {
    let raw: Option<RawWish> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {WISH_COLUMNS} FROM wishes WHERE id = ?1 AND enabled = 1"),
            rusqlite::params![id.0],
            RawWish::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawWish::into_wish).transpose()
  }

  async fn list_wishes(&self, wishlist: WishlistId) -> Result<Vec<Wish>> {
    let raws: Vec<RawWish> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WISH_COLUMNS} FROM wishes
           WHERE wishlist_id = ?1 AND enabled = 1
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![wishlist.0], RawWish::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWish::into_wish).collect()
  }

  // ── Claims ────────────────────────────────────────────────────────────────

  async fn insert_claim(&self, wish: WishId, user: UserId) -> Result<Option<WishClaim>> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken: bool = tx.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM wish_claims WHERE wish_id = ?1 AND enabled = 1
           )",
          rusqlite::params![wish.0],
          |r| r.get(0),
        )?;
        if taken {
          return Ok(None);
        }
        let id = insert_unique(
          &tx,
          "INSERT INTO wish_claims (wish_id, user_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![wish.0, user.0, at_str],
        )?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id.map(|id| WishClaim {
      id: WishClaimId(id),
      wish,
      user,
      created_at,
      lifecycle: Lifecycle::Live,
    }))
  }

  async fn get_live_claim(&self, wish: WishId) -> Result<Option<WishClaim>> {
    let raw: Option<RawClaim> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {CLAIM_COLUMNS} FROM wish_claims WHERE wish_id = ?1 AND enabled = 1"
            ),
            rusqlite::params![wish.0],
            RawClaim::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawClaim::into_claim).transpose()
  }

  async fn release_claim(&self, wish: WishId, user: UserId) -> Result<usize> {
    let at = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE wish_claims SET enabled = 0, disabled_at = ?1
           WHERE wish_id = ?2 AND user_id = ?3 AND enabled = 1",
          rusqlite::params![at, wish.0, user.0],
        )?)
      })
      .await?;
    Ok(changed)
  }
}
