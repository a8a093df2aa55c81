//! Membership resolver: who can reach which record.
//!
//! The relationship graph is a fixed four-level DAG
//! (user → group → wishlist → wish → claim), so every predicate is a walk of
//! at most two joins. "Not a member" is an ordinary `false`; a target that is
//! absent or disabled is [`Error::NotFound`], so callers can tell "no such
//! thing" from "not yours".

use crate::{
  Error, Result,
  group::Group,
  id::{GroupId, UserId, WishId, WishlistId},
  lifecycle::EntityKind,
  store::WishStore,
  user::User,
  wish::Wish,
  wishlist::Wishlist,
};

pub struct Resolver<'a, S> {
  store: &'a S,
}

impl<'a, S> Resolver<'a, S>
where
  S: WishStore,
{
  pub fn new(store: &'a S) -> Self { Self { store } }

  // ── Lookups ───────────────────────────────────────────────────────────

  pub async fn group(&self, id: GroupId) -> Result<Group> {
    self
      .store
      .get_group(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Group, id))
  }

  pub async fn wishlist(&self, id: WishlistId) -> Result<Wishlist> {
    self
      .store
      .get_wishlist(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Wishlist, id))
  }

  pub async fn wish(&self, id: WishId) -> Result<Wish> {
    self
      .store
      .get_wish(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Wish, id))
  }

  /// The redacted profile of a user referenced by another record. A user
  /// disabled after the fact still has a profile; only a missing row is
  /// [`Error::NotFound`].
  pub async fn profile(&self, id: UserId) -> Result<User> {
    self
      .store
      .get_user_record(id)
      .await
      .map_err(Error::store)?
      .map(User::redacted)
      .ok_or_else(|| Error::not_found(EntityKind::User, id))
  }

  // ── Groups ────────────────────────────────────────────────────────────

  pub async fn is_group_member(
    &self,
    user: UserId,
    group: GroupId,
  ) -> Result<bool> {
    self
      .store
      .has_group_membership(group, user)
      .await
      .map_err(Error::store)
  }

  pub async fn is_group_owner(
    &self,
    user: UserId,
    group: GroupId,
  ) -> Result<bool> {
    Ok(self.group(group).await?.owner == user)
  }

  // ── Wishlists ─────────────────────────────────────────────────────────

  pub async fn is_wishlist_owner(
    &self,
    user: UserId,
    wishlist: WishlistId,
  ) -> Result<bool> {
    Ok(self.wishlist(wishlist).await?.owner == user)
  }

  pub async fn group_has_wishlist_access(
    &self,
    group: GroupId,
    wishlist: WishlistId,
  ) -> Result<bool> {
    self
      .store
      .has_wishlist_membership(group, wishlist)
      .await
      .map_err(Error::store)
  }

  /// Owner, or a live member of a live group the wishlist is shared with
  /// through a live share.
  pub async fn user_has_wishlist_access(
    &self,
    user: UserId,
    wishlist: WishlistId,
  ) -> Result<bool> {
    let list = self.wishlist(wishlist).await?;
    self.can_read(user, &list).await
  }

  /// As [`Self::user_has_wishlist_access`], for a wishlist already loaded.
  pub async fn can_read(&self, user: UserId, wishlist: &Wishlist) -> Result<bool> {
    if wishlist.owner == user {
      return Ok(true);
    }
    self
      .store
      .has_wishlist_access_via_group(user, wishlist.id)
      .await
      .map_err(Error::store)
  }

  // ── Wishes and claims ─────────────────────────────────────────────────

  pub async fn is_wish_owner(&self, user: UserId, wish: WishId) -> Result<bool> {
    Ok(self.wish(wish).await?.owner == user)
  }

  pub async fn user_has_wish_access(
    &self,
    user: UserId,
    wish: WishId,
  ) -> Result<bool> {
    let wish = self.wish(wish).await?;
    self.user_has_wishlist_access(user, wish.wishlist).await
  }

  pub async fn is_claim_owner(&self, user: UserId, wish: WishId) -> Result<bool> {
    let claim = self.store.get_live_claim(wish).await.map_err(Error::store)?;
    Ok(claim.is_some_and(|c| c.user == user))
  }
}
