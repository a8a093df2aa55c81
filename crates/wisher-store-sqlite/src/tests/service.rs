use wisher_core::{
  Error,
  error::Conflict,
  group::NewGroup,
  id::{InviteId, UserId},
  lifecycle::EntityKind,
  store::WishStore,
  user::REDACTED,
  wishlist::NewWishlist,
};

use super::{group, new_wish, registration, service, user, wish, wishlist};

// ─── Users and invites ───────────────────────────────────────────────────────

#[tokio::test]
async fn registration_spends_the_invite_once() {
  let svc = service().await;
  let invite = svc.ledger().issue().await.unwrap();
  assert!(svc.ledger().is_consumable(&invite.code).await.unwrap());

  let ada = svc.register(registration("ada@example.com", &invite.code)).await.unwrap();
  assert_eq!(ada.email, "ada@example.com");
  assert!(!svc.ledger().is_consumable(&invite.code).await.unwrap());

  let err = svc
    .register(registration("bob@example.com", &invite.code))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(Conflict::InvalidInvite)));
}

#[tokio::test]
async fn registration_refuses_a_taken_email() {
  let svc = service().await;
  user(&svc, "ada@example.com").await;
  let invite = svc.ledger().issue().await.unwrap();

  let err = svc
    .register(registration("ada@example.com", &invite.code))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(Conflict::EmailInUse)));
  assert!(svc.ledger().is_consumable(&invite.code).await.unwrap());
}

#[tokio::test]
async fn registration_validates_before_touching_the_store() {
  let svc = service().await;
  let invite = svc.ledger().issue().await.unwrap();
  let mut reg = registration("ada@example.com", &invite.code);
  reg.password_repeat = "something else".into();

  assert!(matches!(svc.register(reg).await, Err(Error::Invalid(_))));
  assert!(svc.ledger().is_consumable(&invite.code).await.unwrap());
}

#[tokio::test]
async fn ledger_consume_is_single_use() {
  let svc = service().await;
  let invite = svc.ledger().issue().await.unwrap();

  svc.ledger().consume(&invite.code).await.unwrap();
  assert!(matches!(
    svc.ledger().consume(&invite.code).await,
    Err(Error::Conflict(Conflict::InvalidInvite))
  ));
  assert!(matches!(
    svc.ledger().consume("NOSUCHCODE").await,
    Err(Error::Conflict(Conflict::InvalidInvite))
  ));
}

#[tokio::test]
async fn authentication_checks_the_password() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;

  let found = svc.authenticate("ada@example.com", "correct horse").await.unwrap();
  assert_eq!(found.id, ada.id);
  assert!(matches!(
    svc.authenticate("ada@example.com", "wrong").await,
    Err(Error::InvalidCredentials)
  ));
  assert!(matches!(
    svc.authenticate("nobody@example.com", "correct horse").await,
    Err(Error::InvalidCredentials)
  ));
}

#[tokio::test]
async fn only_self_lookup_reveals_sensitive_fields() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;

  let me = svc.get_user(ada.id, ada.id).await.unwrap();
  assert_eq!(me.email, "ada@example.com");
  assert!(!me.is_redacted());

  let other = svc.get_user(bob.id, ada.id).await.unwrap();
  assert_eq!(other.email, REDACTED);
  assert_eq!(other.password_hash, REDACTED);
  assert_eq!(other.first_name, "ada");

  let all = svc.list_users(ada.id).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().all(|u| u.is_redacted()));

  assert!(matches!(
    svc.get_user(ada.id, UserId(999)).await,
    Err(Error::NotFound { kind: EntityKind::User, id: 999 })
  ));
}

#[tokio::test]
async fn invite_administration_is_admin_only() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;

  assert!(matches!(svc.create_invite(ada.id).await, Err(Error::Unauthorized(_))));
  assert!(matches!(svc.list_invites(ada.id).await, Err(Error::Unauthorized(_))));

  let promoted = svc.grant_admin("ada@example.com").await.unwrap();
  assert!(promoted.admin);

  let invite = svc.create_invite(ada.id).await.unwrap();
  assert_eq!(invite.code.len(), 12);
  let listed = svc.list_invites(ada.id).await.unwrap();
  assert!(listed.contains(&invite));
  assert!(listed.iter().all(|i| i.is_consumable() != i.used));

  svc.disable_invite(ada.id, invite.id).await.unwrap();
  assert!(!svc.list_invites(ada.id).await.unwrap().contains(&invite));
  assert!(matches!(
    svc.disable_invite(ada.id, invite.id).await,
    Err(Error::Conflict(Conflict::AlreadyDisabled { kind: EntityKind::Invite, .. }))
  ));
  assert!(matches!(
    svc.disable_invite(ada.id, InviteId(999)).await,
    Err(Error::NotFound { kind: EntityKind::Invite, id: 999 })
  ));
}

#[tokio::test]
async fn disabled_invite_cannot_register() {
  let svc = service().await;
  let invite = svc.ledger().issue().await.unwrap();
  svc.store().disable(EntityKind::Invite, invite.id.0).await.unwrap();

  let err = svc
    .register(registration("ada@example.com", &invite.code))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(Conflict::InvalidInvite)));
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn group_views_embed_redacted_users() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;
  let view = svc
    .create_group(ada.id, NewGroup { name: "Family".into(), description: "us".into() })
    .await
    .unwrap();
  svc.add_group_member(ada.id, view.group.id, bob.id).await.unwrap();

  let view = svc.get_group(bob.id, view.group.id).await.unwrap();
  assert_eq!(view.owner.id, ada.id);
  assert!(view.owner.is_redacted());
  assert_eq!(view.members.len(), 2);
  assert!(view.members.iter().all(|m| m.user.is_redacted()));
}

#[tokio::test]
async fn group_membership_rules() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;
  let cid = user(&svc, "cid@example.com").await;
  let g = group(&svc, &ada, "Family").await;

  assert!(matches!(
    svc.get_group(bob.id, g.id).await,
    Err(Error::Unauthorized(_))
  ));
  assert!(matches!(
    svc.add_group_member(bob.id, g.id, cid.id).await,
    Err(Error::Unauthorized(_))
  ));
  assert!(matches!(
    svc.add_group_member(ada.id, g.id, UserId(999)).await,
    Err(Error::NotFound { kind: EntityKind::User, .. })
  ));

  let membership = svc.add_group_member(ada.id, g.id, bob.id).await.unwrap();
  assert!(matches!(
    svc.add_group_member(ada.id, g.id, bob.id).await,
    Err(Error::Conflict(Conflict::AlreadyMember))
  ));
  assert_eq!(svc.list_groups(bob.id).await.unwrap(), vec![g.clone()]);

  assert!(matches!(
    svc.remove_group_member(cid.id, membership.id).await,
    Err(Error::Unauthorized(_))
  ));
  svc.remove_group_member(bob.id, membership.id).await.unwrap();
  assert!(svc.list_groups(bob.id).await.unwrap().is_empty());
  assert!(matches!(
    svc.remove_group_member(bob.id, membership.id).await,
    Err(Error::NotFound { kind: EntityKind::GroupMembership, .. })
  ));
}

#[tokio::test]
async fn only_the_owner_disables_a_group() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;
  let g = group(&svc, &ada, "Family").await;
  svc.add_group_member(ada.id, g.id, bob.id).await.unwrap();

  assert!(matches!(svc.disable_group(bob.id, g.id).await, Err(Error::Unauthorized(_))));
  svc.disable_group(ada.id, g.id).await.unwrap();
  assert!(matches!(
    svc.get_group(ada.id, g.id).await,
    Err(Error::NotFound { kind: EntityKind::Group, .. })
  ));
  assert!(svc.list_groups(bob.id).await.unwrap().is_empty());
}

// ─── Wishlists ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn shared_wishlist_is_readable_by_group_members_only() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;
  let cid = user(&svc, "cid@example.com").await;
  let g = group(&svc, &ada, "Family").await;
  svc.add_group_member(ada.id, g.id, bob.id).await.unwrap();
  let w = wishlist(&svc, &ada, "Birthday", vec![g.id]).await;

  let seen = svc.get_wishlist(bob.id, w.wishlist.id).await.unwrap();
  assert!(seen.owner.is_redacted());
  assert_eq!(seen.shares.len(), 1);
  assert_eq!(seen.shares[0].group.id, g.id);

  assert!(matches!(
    svc.get_wishlist(cid.id, w.wishlist.id).await,
    Err(Error::Unauthorized(_))
  ));

  let members = svc.list_wishlist_members(ada.id, w.wishlist.id).await.unwrap();
  assert_eq!(members.len(), 1);
  assert_eq!(members[0].id, bob.id);
  assert!(members[0].is_redacted());

  assert_eq!(
    svc.list_group_wishlists(bob.id, g.id).await.unwrap(),
    vec![w.wishlist.clone()]
  );
  assert!(matches!(
    svc.list_group_wishlists(cid.id, g.id).await,
    Err(Error::Unauthorized(_))
  ));
}

#[tokio::test]
async fn wishlist_groups_must_be_the_owners() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let bob = user(&svc, "bob@example.com").await;
  let bobs = group(&svc, &bob, "Bob's friends").await;

  let err = svc
    .create_wishlist(ada.id, NewWishlist {
      name:        "Birthday".into(),
      description: String::new(),
      groups:      vec![bobs.id],
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));
  assert!(svc.list_wishlists(ada.id).await.unwrap().is_empty());

  let w = wishlist(&svc, &ada, "Birthday", Vec::new()).await;
  assert!(matches!(
    svc.share_wishlist(ada.id, w.wishlist.id, bobs.id).await,
    Err(Error::Unauthorized(_))
  ));
}

#[tokio::test]
async fn wishlist_names_free_up_when_disabled() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let w = wishlist(&svc, &ada, "Birthday", Vec::new()).await;

  let dup = NewWishlist {
    name:        "Birthday".into(),
    description: String::new(),
    groups:      Vec::new(),
  };
  assert!(matches!(
    svc.create_wishlist(ada.id, dup.clone()).await,
    Err(Error::Conflict(Conflict::WishlistNameTaken))
  ));

  svc.disable_wishlist(ada.id, w.wishlist.id).await.unwrap();
  assert!(svc.list_wishlists(ada.id).await.unwrap().is_empty());
  svc.create_wishlist(ada.id, dup).await.unwrap();
}

#[tokio::test]
async fn sharing_twice_is_a_conflict() {
  let svc = service().await;
  let ada = user(&svc, "ada@example.com").await;
  let g = group(&svc, &ada, "Family").await;
  let w = wishlist(&svc, &ada, "Birthday", Vec::new()).await;

  let share = svc.share_wishlist(ada.id, w.wishlist.id, g.id).await.unwrap();
  assert!(matches!(
    svc.share_wishlist(ada.id, w.wishlist.id, g.id).await,
    Err(Error::Conflict(Conflict::AlreadyShared))
  ));
  svc.unshare_wishlist(ada.id, share.id).await.unwrap();
  svc.share_wishlist(ada.id, w.wishlist.id, g.id).await.unwrap();
}

// ─── Wishes and claims ───────────────────────────────────────────────────────

#[tokio::test]
async fn claims_are_hidden_from_the_wish_owner() {
  let svc = service().await;
  let a = user(&svc, "a@example.com").await;
  let b = user(&svc, "b@example.com").await;
  let c = user(&svc, "c@example.com").await;
  let g = group(&svc, &a, "Family").await;
  svc.add_group_member(a.id, g.id, b.id).await.unwrap();
  svc.add_group_member(a.id, g.id, c.id).await.unwrap();
  let w = wishlist(&svc, &a, "Birthday", vec![g.id]).await;
  let x = wish(&svc, &a, &w, "Bicycle").await;

  let claim = svc.claim_wish(b.id, x.wish.id).await.unwrap();
  assert_eq!(claim.claim.user, b.id);
  assert!(claim.claimer.is_redacted());

  assert!(svc.claims_for_wish(a.id, x.wish.id).await.unwrap().is_empty());
  assert!(svc.get_wish(a.id, x.wish.id).await.unwrap().claims.is_empty());

  let seen_by_b = svc.claims_for_wish(b.id, x.wish.id).await.unwrap();
  assert_eq!(seen_by_b.len(), 1);
  assert_eq!(seen_by_b[0].claimer.id, b.id);
  assert!(seen_by_b[0].claimer.is_redacted());

  let listed = svc.list_wishes(c.id, w.wishlist.id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].claims.len(), 1);
  assert_eq!(listed[0].claims[0].claimer.id, b.id);
}

#[tokio::test]
async fn disabled_users_keep_their_profiles_in_views() {
  let svc = service().await;
  let a = user(&svc, "a@example.com").await;
  let b = user(&svc, "b@example.com").await;
  let c = user(&svc, "c@example.com").await;
  let g = group(&svc, &a, "Family").await;
  svc.add_group_member(a.id, g.id, b.id).await.unwrap();
  svc.add_group_member(a.id, g.id, c.id).await.unwrap();
  let w = wishlist(&svc, &a, "Birthday", vec![g.id]).await;
  let x = wish(&svc, &a, &w, "Bicycle").await;
  svc.claim_wish(b.id, x.wish.id).await.unwrap();

  svc.store().disable(EntityKind::User, a.id.0).await.unwrap();
  svc.store().disable(EntityKind::User, b.id.0).await.unwrap();

  let listed = svc.list_wishes(c.id, w.wishlist.id).await.unwrap();
  assert_eq!(listed[0].owner.id, a.id);
  assert!(listed[0].owner.is_redacted());
  assert_eq!(listed[0].claims[0].claimer.id, b.id);
  assert!(listed[0].claims[0].claimer.is_redacted());

  let view = svc.get_group(c.id, g.id).await.unwrap();
  assert_eq!(view.owner.id, a.id);
  assert_eq!(view.members.len(), 1);
  assert_eq!(view.members[0].user.id, c.id);

  assert_eq!(svc.get_wishlist(c.id, w.wishlist.id).await.unwrap().owner.id, a.id);
}

#[tokio::test]
async fn claim_rules() {
  let svc = service().await;
  let a = user(&svc, "a@example.com").await;
  let b = user(&svc, "b@example.com").await;
  let c = user(&svc, "c@example.com").await;
  let outsider = user(&svc, "d@example.com").await;
  let g = group(&svc, &a, "Family").await;
  svc.add_group_member(a.id, g.id, b.id).await.unwrap();
  svc.add_group_member(a.id, g.id, c.id).await.unwrap();
  let w = wishlist(&svc, &a, "Birthday", vec![g.id]).await;
  let x = wish(&svc, &a, &w, "Bicycle").await;

  assert!(matches!(svc.claim_wish(a.id, x.wish.id).await, Err(Error::Unauthorized(_))));
  assert!(matches!(
    svc.claim_wish(outsider.id, x.wish.id).await,
    Err(Error::Unauthorized(_))
  ));
  assert!(matches!(
    svc.unclaim_wish(b.id, x.wish.id).await,
    Err(Error::Conflict(Conflict::NotClaimed))
  ));

  let held = svc.claim_wish(b.id, x.wish.id).await.unwrap();
  assert!(matches!(
    svc.claim_wish(c.id, x.wish.id).await,
    Err(Error::Conflict(Conflict::AlreadyClaimed))
  ));
  match svc.unclaim_wish(c.id, x.wish.id).await {
    Err(Error::Unauthorized(target)) => {
      assert_eq!(target, format!("wish_claim {}", held.claim.id));
    }
    other => panic!("expected Unauthorized, got {other:?}"),
  }

  svc.unclaim_wish(b.id, x.wish.id).await.unwrap();
  assert!(svc.claims_for_wish(c.id, x.wish.id).await.unwrap().is_empty());
  svc.claim_wish(c.id, x.wish.id).await.unwrap();
}

#[tokio::test]
async fn wish_lifecycle() {
  let svc = service().await;
  let a = user(&svc, "a@example.com").await;
  let b = user(&svc, "b@example.com").await;
  let c = user(&svc, "c@example.com").await;
  let g = group(&svc, &a, "Family").await;
  svc.add_group_member(a.id, g.id, b.id).await.unwrap();
  svc.add_group_member(a.id, g.id, c.id).await.unwrap();
  let w = wishlist(&svc, &a, "Birthday", vec![g.id]).await;

  let by_b = svc
    .create_wish(b.id, w.wishlist.id, new_wish("Surprise"))
    .await
    .unwrap();
  assert_eq!(by_b.wish.owner, b.id);
  assert!(by_b.owner.is_redacted());
  assert!(matches!(
    svc.create_wish(a.id, w.wishlist.id, new_wish("Surprise")).await,
    Err(Error::Conflict(Conflict::WishNameTaken))
  ));
  assert!(matches!(
    svc.create_wish(a.id, w.wishlist.id, new_wish("  ")).await,
    Err(Error::Invalid(_))
  ));

  assert!(matches!(
    svc.disable_wish(c.id, by_b.wish.id).await,
    Err(Error::Unauthorized(_))
  ));
  svc.disable_wish(a.id, by_b.wish.id).await.unwrap();
  assert!(matches!(
    svc.get_wish(b.id, by_b.wish.id).await,
    Err(Error::NotFound { kind: EntityKind::Wish, .. })
  ));
  assert!(svc.list_wishes(a.id, w.wishlist.id).await.unwrap().is_empty());

  svc
    .create_wish(a.id, w.wishlist.id, new_wish("Surprise"))
    .await
    .unwrap();
}

#[tokio::test]
async fn disabled_wishlist_hides_its_wishes() {
  let svc = service().await;
  let a = user(&svc, "a@example.com").await;
  let b = user(&svc, "b@example.com").await;
  let g = group(&svc, &a, "Family").await;
  svc.add_group_member(a.id, g.id, b.id).await.unwrap();
  let w = wishlist(&svc, &a, "Birthday", vec![g.id]).await;
  let x = wish(&svc, &a, &w, "Bicycle").await;

  svc.disable_wishlist(a.id, w.wishlist.id).await.unwrap();
  assert!(matches!(
    svc.get_wish(b.id, x.wish.id).await,
    Err(Error::NotFound { kind: EntityKind::Wishlist, .. })
  ));
  assert!(svc.list_group_wishlists(b.id, g.id).await.unwrap().is_empty());
}
