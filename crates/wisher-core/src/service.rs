//! [`Service`]: every operation the request layer can invoke.
//!
//! Each method takes the authenticated acting user, loads its target through
//! the store, checks the actor against the [`Resolver`], applies the
//! uniqueness guard on writes and the visibility rules on reads, and returns
//! redacted results or a typed [`Error`].

use crate::{
  Error, Result,
  error::Conflict,
  group::{Group, GroupMembership, GroupView, MemberView, NewGroup},
  guard,
  id::{
    GroupId, GroupMembershipId, InviteId, UserId, WishId, WishlistId,
    WishlistMembershipId,
  },
  invite::Invite,
  ledger::InviteLedger,
  lifecycle::{self, EntityKind},
  password,
  resolver::Resolver,
  store::{RegisterOutcome, WishStore},
  user::{NewUser, Registration, User},
  visibility,
  wish::{ClaimView, NewWish, Wish, WishView},
  wishlist::{NewWishlist, ShareView, Wishlist, WishlistMembership, WishlistView},
};

/// The authorization and relationship-integrity engine over a store `S`.
///
/// The store is handed in by the caller; the service holds no other state.
pub struct Service<S> {
  store: S,
}

impl<S> Service<S>
where
  S: WishStore,
{
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  pub fn resolver(&self) -> Resolver<'_, S> { Resolver::new(&self.store) }

  pub fn ledger(&self) -> InviteLedger<'_, S> { InviteLedger::new(&self.store) }

  async fn live_user(&self, id: UserId) -> Result<User> {
    self
      .store
      .get_user(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::User, id))
  }

  async fn require_admin(&self, actor: UserId) -> Result<()> {
    if self.live_user(actor).await?.admin {
      Ok(())
    } else {
      Err(Error::Unauthorized("administrator rights required".into()))
    }
  }

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create an account, spending the invite code. Returns the new user
  /// unredacted, since the caller is that user.
  pub async fn register(&self, registration: Registration) -> Result<User> {
    registration.validate()?;
    let code = registration.invite_code.trim().to_owned();
    let email = registration.email.trim().to_owned();

    if !self.ledger().is_consumable(&code).await? {
      return Err(Conflict::InvalidInvite.into());
    }
    guard::ensure_email_available(&self.store, &email).await?;

    let user = NewUser {
      email,
      password_hash: password::hash_password(&registration.password)?,
      first_name: registration.first_name.trim().to_owned(),
      last_name: registration.last_name.trim().to_owned(),
    };

    match self
      .store
      .register_user(user, code)
      .await
      .map_err(Error::store)?
    {
      RegisterOutcome::Registered(user) => Ok(user),
      RegisterOutcome::InvalidInvite => Err(Conflict::InvalidInvite.into()),
      RegisterOutcome::EmailTaken => Err(Conflict::EmailInUse.into()),
    }
  }

  /// Check an e-mail and password pair against the live users.
  pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
    let user = self
      .store
      .find_user_by_email(email.trim().to_owned())
      .await
      .map_err(Error::store)?
      .ok_or(Error::InvalidCredentials)?;

    if password::verify_password(password, &user.password_hash) {
      Ok(user)
    } else {
      Err(Error::InvalidCredentials)
    }
  }

  /// Look up a user. Only a self-lookup sees e-mail and password hash.
  pub async fn get_user(&self, actor: UserId, id: UserId) -> Result<User> {
    Ok(self.live_user(id).await?.visible_to(actor))
  }

  pub async fn list_users(&self, _actor: UserId) -> Result<Vec<User>> {
    let users = self.store.list_users().await.map_err(Error::store)?;
    Ok(users.into_iter().map(User::redacted).collect())
  }

  /// Operator-level: make the live user holding `email` an administrator.
  pub async fn grant_admin(&self, email: &str) -> Result<User> {
    let user = self
      .store
      .find_user_by_email(email.trim().to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::Invalid(format!("no user with e-mail {email}")))?;
    self
      .store
      .set_user_admin(user.id, true)
      .await
      .map_err(Error::store)?;
    self.live_user(user.id).await
  }

  // ── Invites ───────────────────────────────────────────────────────────

  pub async fn create_invite(&self, actor: UserId) -> Result<Invite> {
    self.require_admin(actor).await?;
    self.ledger().issue().await
  }

  pub async fn list_invites(&self, actor: UserId) -> Result<Vec<Invite>> {
    self.require_admin(actor).await?;
    self.store.list_invites().await.map_err(Error::store)
  }

  pub async fn disable_invite(&self, actor: UserId, id: InviteId) -> Result<()> {
    self.require_admin(actor).await?;
    lifecycle::disable(&self.store, EntityKind::Invite, id.into()).await
  }

  // ── Groups ────────────────────────────────────────────────────────────

  /// Create a group owned by `actor`, who also becomes its first member.
  pub async fn create_group(
    &self,
    actor: UserId,
    input: NewGroup,
  ) -> Result<GroupView> {
    guard::require_name("group name", &input.name)?;
    let input = NewGroup {
      name:        input.name.trim().to_owned(),
      description: input.description,
    };
    let group = self
      .store
      .insert_group(actor, input)
      .await
      .map_err(Error::store)?;
    self.group_view(group).await
  }

  pub async fn get_group(&self, actor: UserId, id: GroupId) -> Result<GroupView> {
    let group = self.resolver().group(id).await?;
    if group.owner != actor && !self.resolver().is_group_member(actor, id).await? {
      return Err(Error::unauthorized(EntityKind::Group, id));
    }
    self.group_view(group).await
  }

  /// Live groups the actor is a live member of.
  pub async fn list_groups(&self, actor: UserId) -> Result<Vec<Group>> {
    self
      .store
      .list_groups_for_member(actor)
      .await
      .map_err(Error::store)
  }

  pub async fn disable_group(&self, actor: UserId, id: GroupId) -> Result<()> {
    if !self.resolver().is_group_owner(actor, id).await? {
      return Err(Error::unauthorized(EntityKind::Group, id));
    }
    lifecycle::disable(&self.store, EntityKind::Group, id.into()).await
  }

  pub async fn add_group_member(
    &self,
    actor: UserId,
    group: GroupId,
    member: UserId,
  ) -> Result<GroupMembership> {
    if !self.resolver().is_group_owner(actor, group).await? {
      return Err(Error::unauthorized(EntityKind::Group, group));
    }
    self.live_user(member).await?;
    self
      .store
      .insert_group_membership(group, member)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Conflict::AlreadyMember.into())
  }

  /// Remove a membership. Allowed for the group owner and for the member
  /// leaving on their own.
  pub async fn remove_group_member(
    &self,
    actor: UserId,
    id: GroupMembershipId,
  ) -> Result<()> {
    let membership = self
      .store
      .get_group_membership(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::GroupMembership, id))?;
    let group = self.resolver().group(membership.group).await?;
    if actor != group.owner && actor != membership.member {
      return Err(Error::unauthorized(EntityKind::GroupMembership, id));
    }
    lifecycle::disable(&self.store, EntityKind::GroupMembership, id.into()).await
  }

  async fn group_view(&self, group: Group) -> Result<GroupView> {
    let owner = self.resolver().profile(group.owner).await?;
    let memberships = self
      .store
      .list_group_memberships(group.id)
      .await
      .map_err(Error::store)?;

    let mut members = Vec::with_capacity(memberships.len());
    for membership in memberships {
      let user = self.resolver().profile(membership.member).await?;
      members.push(MemberView { membership, user });
    }

    Ok(GroupView { group, owner, members })
  }

  // ── Wishlists ─────────────────────────────────────────────────────────

  /// Create a wishlist owned by `actor`, optionally shared with groups the
  /// actor belongs to. Every group is checked before anything is written,
  /// and the wishlist and its shares are written together.
  pub async fn create_wishlist(
    &self,
    actor: UserId,
    input: NewWishlist,
  ) -> Result<WishlistView> {
    guard::require_name("wishlist name", &input.name)?;
    let name = input.name.trim().to_owned();
    guard::ensure_wishlist_name_available(&self.store, actor, &name).await?;

    let mut groups = input.groups;
    groups.sort();
    groups.dedup();
    for &group in &groups {
      self.resolver().group(group).await?;
      if !self.resolver().is_group_member(actor, group).await? {
        return Err(Error::unauthorized(EntityKind::Group, group));
      }
    }

    let wishlist = self
      .store
      .insert_wishlist(actor, name, input.description, groups)
      .await
      .map_err(Error::store)?
      .ok_or(Conflict::WishlistNameTaken)?;

    self.wishlist_view(wishlist).await
  }

  pub async fn get_wishlist(
    &self,
    actor: UserId,
    id: WishlistId,
  ) -> Result<WishlistView> {
    let wishlist = self.readable_wishlist(actor, id).await?;
    self.wishlist_view(wishlist).await
  }

  /// Live wishlists the actor owns.
  pub async fn list_wishlists(&self, actor: UserId) -> Result<Vec<Wishlist>> {
    self
      .store
      .list_wishlists_by_owner(actor)
      .await
      .map_err(Error::store)
  }

  /// Live wishlists shared with a group, for the group's members.
  pub async fn list_group_wishlists(
    &self,
    actor: UserId,
    group: GroupId,
  ) -> Result<Vec<Wishlist>> {
    let found = self.resolver().group(group).await?;
    if found.owner != actor && !self.resolver().is_group_member(actor, group).await? {
      return Err(Error::unauthorized(EntityKind::Group, group));
    }
    self
      .store
      .list_wishlists_for_group(group)
      .await
      .map_err(Error::store)
  }

  /// Users who reach the wishlist through a group, the owner excluded.
  pub async fn list_wishlist_members(
    &self,
    actor: UserId,
    id: WishlistId,
  ) -> Result<Vec<User>> {
    self.readable_wishlist(actor, id).await?;
    let users = self
      .store
      .list_wishlist_members(id)
      .await
      .map_err(Error::store)?;
    Ok(users.into_iter().map(User::redacted).collect())
  }

  /// Share a wishlist with a group. Only the wishlist owner may do so, and
  /// only with a group they belong to.
  pub async fn share_wishlist(
    &self,
    actor: UserId,
    wishlist: WishlistId,
    group: GroupId,
  ) -> Result<WishlistMembership> {
    if !self.resolver().is_wishlist_owner(actor, wishlist).await? {
      return Err(Error::unauthorized(EntityKind::Wishlist, wishlist));
    }
    self.resolver().group(group).await?;
    if !self.resolver().is_group_member(actor, group).await? {
      return Err(Error::unauthorized(EntityKind::Group, group));
    }
    self
      .store
      .insert_wishlist_membership(wishlist, group)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Conflict::AlreadyShared.into())
  }

  pub async fn unshare_wishlist(
    &self,
    actor: UserId,
    id: WishlistMembershipId,
  ) -> Result<()> {
    let membership = self
      .store
      .get_wishlist_membership(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::WishlistMembership, id))?;
    if !self
      .resolver()
      .is_wishlist_owner(actor, membership.wishlist)
      .await?
    {
      return Err(Error::unauthorized(EntityKind::WishlistMembership, id));
    }
    lifecycle::disable(&self.store, EntityKind::WishlistMembership, id.into())
      .await
  }

  pub async fn disable_wishlist(&self, actor: UserId, id: WishlistId) -> Result<()> {
    if !self.resolver().is_wishlist_owner(actor, id).await? {
      return Err(Error::unauthorized(EntityKind::Wishlist, id));
    }
    lifecycle::disable(&self.store, EntityKind::Wishlist, id.into()).await
  }

  async fn readable_wishlist(&self, actor: UserId, id: WishlistId) -> Result<Wishlist> {
    let wishlist = self.resolver().wishlist(id).await?;
    if !self.resolver().can_read(actor, &wishlist).await? {
      return Err(Error::unauthorized(EntityKind::Wishlist, id));
    }
    Ok(wishlist)
  }

  async fn wishlist_view(&self, wishlist: Wishlist) -> Result<WishlistView> {
    let owner = self.resolver().profile(wishlist.owner).await?;
    let memberships = self
      .store
      .list_wishlist_memberships(wishlist.id)
      .await
      .map_err(Error::store)?;

    let mut shares = Vec::with_capacity(memberships.len());
    for membership in memberships {
      let group = self.resolver().group(membership.group).await?;
      shares.push(ShareView { membership, group });
    }

    Ok(WishlistView { wishlist, owner, shares })
  }

  // ── Wishes ────────────────────────────────────────────────────────────

  /// Add a wish to a wishlist the actor can read; the actor owns the wish.
  pub async fn create_wish(
    &self,
    actor: UserId,
    wishlist: WishlistId,
    input: NewWish,
  ) -> Result<WishView> {
    self.readable_wishlist(actor, wishlist).await?;
    guard::require_name("wish name", &input.name)?;
    let input = NewWish {
      name: input.name.trim().to_owned(),
      note: input.note,
      url:  input.url.trim().to_owned(),
    };
    guard::ensure_wish_name_available(&self.store, wishlist, &input.name).await?;

    let wish = self
      .store
      .insert_wish(wishlist, actor, input)
      .await
      .map_err(Error::store)?
      .ok_or(Conflict::WishNameTaken)?;
    self.wish_view(wish, actor).await
  }

  pub async fn get_wish(&self, actor: UserId, id: WishId) -> Result<WishView> {
    let wish = self.readable_wish(actor, id).await?;
    self.wish_view(wish, actor).await
  }

  pub async fn list_wishes(
    &self,
    actor: UserId,
    wishlist: WishlistId,
  ) -> Result<Vec<WishView>> {
    self.readable_wishlist(actor, wishlist).await?;
    let wishes = self
      .store
      .list_wishes(wishlist)
      .await
      .map_err(Error::store)?;

    let mut views = Vec::with_capacity(wishes.len());
    for wish in wishes {
      views.push(self.wish_view(wish, actor).await?);
    }
    Ok(views)
  }

  /// Disable a wish. Allowed for the wish owner and the wishlist owner.
  pub async fn disable_wish(&self, actor: UserId, id: WishId) -> Result<()> {
    let wish = self.resolver().wish(id).await?;
    let wishlist = self.resolver().wishlist(wish.wishlist).await?;
    if wish.owner != actor && wishlist.owner != actor {
      return Err(Error::unauthorized(EntityKind::Wish, id));
    }
    lifecycle::disable(&self.store, EntityKind::Wish, id.into()).await
  }

  /// A live wish on a live wishlist the actor can read.
  async fn readable_wish(&self, actor: UserId, id: WishId) -> Result<Wish> {
    let wish = self.resolver().wish(id).await?;
    let wishlist = self.resolver().wishlist(wish.wishlist).await?;
    if !self.resolver().can_read(actor, &wishlist).await? {
      return Err(Error::unauthorized(EntityKind::Wish, id));
    }
    Ok(wish)
  }

  async fn wish_view(&self, wish: Wish, viewer: UserId) -> Result<WishView> {
    let owner = self.resolver().profile(wish.owner).await?;
    let claims =
      visibility::claims_for_loaded_wish(&self.store, &wish, viewer).await?;
    Ok(WishView { wish, owner, claims })
  }

  // ── Claims ────────────────────────────────────────────────────────────

  /// Reserve a wish. The wish owner cannot claim their own wish, and a wish
  /// holds at most one live claim.
  pub async fn claim_wish(&self, actor: UserId, id: WishId) -> Result<ClaimView> {
    let wish = self.readable_wish(actor, id).await?;
    if wish.owner == actor {
      return Err(Error::Unauthorized("cannot claim your own wish".into()));
    }
    let claim = self
      .store
      .insert_claim(wish.id, actor)
      .await
      .map_err(Error::store)?
      .ok_or(Conflict::AlreadyClaimed)?;
    let claimer = self.live_user(actor).await?.redacted();
    Ok(ClaimView { claim, claimer })
  }

  /// Withdraw the actor's own claim. Claims are addressed by their wish.
  pub async fn unclaim_wish(&self, actor: UserId, id: WishId) -> Result<()> {
    let wish = self.resolver().wish(id).await?;
    let claim = self
      .store
      .get_live_claim(wish.id)
      .await
      .map_err(Error::store)?
      .ok_or(Conflict::NotClaimed)?;
    if claim.user != actor {
      return Err(Error::unauthorized(EntityKind::WishClaim, claim.id));
    }

    let changed = self
      .store
      .release_claim(wish.id, actor)
      .await
      .map_err(Error::store)?;
    if changed == 1 {
      Ok(())
    } else {
      Err(
        Conflict::AlreadyDisabled { kind: EntityKind::WishClaim, id: claim.id.into() }
          .into(),
      )
    }
  }

  /// Claims on a wish the actor can read, filtered for the actor.
  pub async fn claims_for_wish(
    &self,
    actor: UserId,
    id: WishId,
  ) -> Result<Vec<ClaimView>> {
    let wish = self.readable_wish(actor, id).await?;
    visibility::claims_for_loaded_wish(&self.store, &wish, actor).await
  }
}
