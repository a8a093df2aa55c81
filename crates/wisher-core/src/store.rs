//! The `WishStore` trait: the durable entity store the core runs against.
//!
//! The trait is implemented by storage backends (e.g. `wisher-store-sqlite`).
//! It knows nothing about authorization. Every `get_*` and `list_*` method
//! returns live rows only; [`WishStore::lifecycle`] is the single lookup that
//! sees disabled rows.
//!
//! Domain outcomes travel in the `Ok` path: an absent row is `None`, a
//! uniqueness collision on insert is `None`, and conditional updates report
//! the number of rows they changed. `Err` is reserved for backend failures.

use std::future::Future;

use crate::{
  group::{Group, GroupMembership, NewGroup},
  id::{GroupId, GroupMembershipId, UserId, WishId, WishlistId, WishlistMembershipId},
  invite::Invite,
  lifecycle::{EntityKind, Lifecycle},
  user::{NewUser, User},
  wish::{NewWish, Wish, WishClaim},
  wishlist::{Wishlist, WishlistMembership},
};

/// Result of [`WishStore::register_user`].
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
  Registered(User),
  /// No live, unused invite matched the code. Nothing was written.
  InvalidInvite,
  /// A live user already holds the e-mail. Nothing was written.
  EmailTaken,
}

/// Abstraction over a durable store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait WishStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Any kind ──────────────────────────────────────────────────────────

  /// Disable a live row: set `enabled = false` and stamp the time, in one
  /// conditional update. Returns the number of rows changed.
  fn disable(
    &self,
    kind: EntityKind,
    id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Lifecycle of a row regardless of its state. `None` if no such row was
  /// ever written.
  fn lifecycle(
    &self,
    kind: EntityKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<Lifecycle>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Consume `invite_code` and insert the user as one atomic step.
  ///
  /// Either the invite flips to used and the user row appears, or nothing
  /// changes.
  fn register_user(
    &self,
    user: NewUser,
    invite_code: String,
  ) -> impl Future<Output = Result<RegisterOutcome, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// A user by id whatever its lifecycle, for embedding the public profile
  /// of an owner or claimer who has since been disabled.
  fn get_user_record(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Set the admin flag of a live user. Returns the number of rows changed.
  fn set_user_admin(
    &self,
    id: UserId,
    admin: bool,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Invites ───────────────────────────────────────────────────────────

  /// Insert an unused invite. `None` if the code has ever been issued.
  fn insert_invite(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Option<Invite>, Self::Error>> + Send + '_;

  fn list_invites(
    &self,
  ) -> impl Future<Output = Result<Vec<Invite>, Self::Error>> + Send + '_;

  /// Number of live, unused invites carrying `code`.
  fn count_consumable_invites(
    &self,
    code: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Mark the live, unused invite carrying `code` as used, guarded by
  /// `used = false` in the same statement. Returns the number of rows changed.
  fn consume_invite(
    &self,
    code: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Insert a group together with the owner's own membership.
  fn insert_group(
    &self,
    owner: UserId,
    group: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn get_group(
    &self,
    id: GroupId,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Live groups in which `member` holds a live membership.
  fn list_groups_for_member(
    &self,
    member: UserId,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Insert a membership unless a live one for the pair already exists
  /// (`None`). Check and insert happen in one transaction.
  fn insert_group_membership(
    &self,
    group: GroupId,
    member: UserId,
  ) -> impl Future<Output = Result<Option<GroupMembership>, Self::Error>> + Send + '_;

  fn get_group_membership(
    &self,
    id: GroupMembershipId,
  ) -> impl Future<Output = Result<Option<GroupMembership>, Self::Error>> + Send + '_;

  /// Live memberships of `group` whose member is a live user.
  fn list_group_memberships(
    &self,
    group: GroupId,
  ) -> impl Future<Output = Result<Vec<GroupMembership>, Self::Error>> + Send + '_;

  /// Whether at least one live membership links the pair.
  fn has_group_membership(
    &self,
    group: GroupId,
    member: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Wishlists ─────────────────────────────────────────────────────────

  fn count_live_wishlists_named(
    &self,
    owner: UserId,
    name: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Insert a wishlist together with its initial shares, all or nothing.
  /// `None` if the owner already has a live wishlist with this name.
  fn insert_wishlist(
    &self,
    owner: UserId,
    name: String,
    description: String,
    groups: Vec<GroupId>,
  ) -> impl Future<Output = Result<Option<Wishlist>, Self::Error>> + Send + '_;

  fn get_wishlist(
    &self,
    id: WishlistId,
  ) -> impl Future<Output = Result<Option<Wishlist>, Self::Error>> + Send + '_;

  fn list_wishlists_by_owner(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<Vec<Wishlist>, Self::Error>> + Send + '_;

  /// Live wishlists linked to `group` by a live wishlist membership.
  fn list_wishlists_for_group(
    &self,
    group: GroupId,
  ) -> impl Future<Output = Result<Vec<Wishlist>, Self::Error>> + Send + '_;

  /// Insert a share unless a live one for the pair already exists (`None`).
  fn insert_wishlist_membership(
    &self,
    wishlist: WishlistId,
    group: GroupId,
  ) -> impl Future<Output = Result<Option<WishlistMembership>, Self::Error>> + Send + '_;

  fn get_wishlist_membership(
    &self,
    id: WishlistMembershipId,
  ) -> impl Future<Output = Result<Option<WishlistMembership>, Self::Error>> + Send + '_;

  /// Live memberships of `wishlist` whose group is live.
  fn list_wishlist_memberships(
    &self,
    wishlist: WishlistId,
  ) -> impl Future<Output = Result<Vec<WishlistMembership>, Self::Error>> + Send + '_;

  /// Whether at least one live wishlist membership links the pair.
  fn has_wishlist_membership(
    &self,
    group: GroupId,
    wishlist: WishlistId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether a live chain user → group membership → group → wishlist
  /// membership → wishlist exists, every link and the group being live.
  fn has_wishlist_access_via_group(
    &self,
    user: UserId,
    wishlist: WishlistId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Distinct live users reaching `wishlist` through a live group, excluding
  /// the wishlist owner.
  fn list_wishlist_members(
    &self,
    wishlist: WishlistId,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Wishes ────────────────────────────────────────────────────────────

  fn count_live_wishes_named(
    &self,
    wishlist: WishlistId,
    name: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// `None` if the wishlist already has a live wish with this name.
  fn insert_wish(
    &self,
    wishlist: WishlistId,
    owner: UserId,
    wish: NewWish,
  ) -> impl Future<Output = Result<Option<Wish>, Self::Error>> + Send + '_;

  fn get_wish(
    &self,
    id: WishId,
  ) -> impl Future<Output = Result<Option<Wish>, Self::Error>> + Send + '_;

  fn list_wishes(
    &self,
    wishlist: WishlistId,
  ) -> impl Future<Output = Result<Vec<Wish>, Self::Error>> + Send + '_;

  // ── Claims ────────────────────────────────────────────────────────────

  /// Insert a claim unless the wish already has a live one (`None`).
  fn insert_claim(
    &self,
    wish: WishId,
    user: UserId,
  ) -> impl Future<Output = Result<Option<WishClaim>, Self::Error>> + Send + '_;

  fn get_live_claim(
    &self,
    wish: WishId,
  ) -> impl Future<Output = Result<Option<WishClaim>, Self::Error>> + Send + '_;

  /// Disable the live claim `user` holds on `wish`. Returns the number of rows
  /// changed.
  fn release_claim(
    &self,
    wish: WishId,
    user: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
