use strum::IntoEnumIterator as _;
use wisher_core::{
  group::NewGroup,
  id::{GroupId, WishId, WishlistId},
  lifecycle::{EntityKind, Lifecycle},
  store::{RegisterOutcome, WishStore},
  user::{NewUser, User},
  wish::NewWish,
};

use super::store;
use crate::SqliteStore;

fn new_user(email: &str) -> NewUser {
  NewUser {
    email:         email.into(),
    password_hash: "$argon2id$v=19$placeholder".into(),
    first_name:    "Ada".into(),
    last_name:     "Lovelace".into(),
  }
}

async fn registered(s: &SqliteStore, email: &str, code: &str) -> User {
  s.insert_invite(code.into()).await.unwrap().unwrap();
  match s.register_user(new_user(email), code.into()).await.unwrap() {
    RegisterOutcome::Registered(user) => user,
    other => panic!("registration failed: {other:?}"),
  }
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn disable_is_a_one_way_conditional_update() {
  let s = store().await;
  let invite = s.insert_invite("C0FFEE".into()).await.unwrap().unwrap();

  assert_eq!(s.disable(EntityKind::Invite, invite.id.0).await.unwrap(), 1);
  assert_eq!(s.disable(EntityKind::Invite, invite.id.0).await.unwrap(), 0);

  let lifecycle = s.lifecycle(EntityKind::Invite, invite.id.0).await.unwrap();
  assert!(matches!(lifecycle, Some(Lifecycle::Disabled { .. })));
  assert!(s.list_invites().await.unwrap().is_empty());
}

#[tokio::test]
async fn lifecycle_of_unknown_rows_is_none_for_every_kind() {
  let s = store().await;
  for kind in EntityKind::iter() {
    assert_eq!(s.lifecycle(kind, 4242).await.unwrap(), None, "{kind}");
    assert_eq!(s.disable(kind, 4242).await.unwrap(), 0, "{kind}");
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn registration_consumes_invite_and_records_consumer() {
  let s = store().await;
  let user = registered(&s, "ada@example.com", "ABC123").await;

  let invites = s.list_invites().await.unwrap();
  assert_eq!(invites.len(), 1);
  assert!(invites[0].used);
  assert!(!invites[0].is_consumable());
  assert_eq!(invites[0].used_by, Some(user.id));
  assert_eq!(s.count_consumable_invites("ABC123".into()).await.unwrap(), 0);

  let again = s
    .register_user(new_user("other@example.com"), "ABC123".into())
    .await
    .unwrap();
  assert!(matches!(again, RegisterOutcome::InvalidInvite));
  assert!(s.find_user_by_email("other@example.com".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn taken_email_leaves_invite_unspent() {
  let s = store().await;
  registered(&s, "ada@example.com", "AAAAAA").await;
  s.insert_invite("BBBBBB".into()).await.unwrap().unwrap();

  let outcome = s
    .register_user(new_user("ada@example.com"), "BBBBBB".into())
    .await
    .unwrap();
  assert!(matches!(outcome, RegisterOutcome::EmailTaken));
  assert_eq!(s.count_consumable_invites("BBBBBB".into()).await.unwrap(), 1);
}

#[tokio::test]
async fn disabled_user_frees_their_email() {
  let s = store().await;
  let first = registered(&s, "ada@example.com", "AAAAAA").await;
  s.disable(EntityKind::User, first.id.0).await.unwrap();

  assert!(s.get_user(first.id).await.unwrap().is_none());
  let second = registered(&s, "ada@example.com", "BBBBBB").await;
  assert_ne!(first.id, second.id);
  assert_eq!(s.list_users().await.unwrap(), vec![second]);
}

#[tokio::test]
async fn invite_codes_are_never_reissued() {
  let s = store().await;
  let invite = s.insert_invite("DEADBEEF".into()).await.unwrap().unwrap();
  s.disable(EntityKind::Invite, invite.id.0).await.unwrap();
  assert!(s.insert_invite("DEADBEEF".into()).await.unwrap().is_none());
}

// ─── Groups and wishlists ────────────────────────────────────────────────────

#[tokio::test]
async fn new_group_includes_its_owner() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let group = s
    .insert_group(owner.id, NewGroup { name: "Family".into(), description: String::new() })
    .await
    .unwrap();

  assert!(s.has_group_membership(group.id, owner.id).await.unwrap());
  let members = s.list_group_memberships(group.id).await.unwrap();
  assert_eq!(members.len(), 1);
  assert_eq!(members[0].member, owner.id);
  assert_eq!(s.list_groups_for_member(owner.id).await.unwrap(), vec![group]);
}

#[tokio::test]
async fn duplicate_live_membership_is_refused() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let other = registered(&s, "bob@example.com", "BBBBBB").await;
  let group = s
    .insert_group(owner.id, NewGroup { name: "Family".into(), description: String::new() })
    .await
    .unwrap();

  let first = s.insert_group_membership(group.id, other.id).await.unwrap().unwrap();
  assert!(s.insert_group_membership(group.id, other.id).await.unwrap().is_none());

  s.disable(EntityKind::GroupMembership, first.id.0).await.unwrap();
  assert!(!s.has_group_membership(group.id, other.id).await.unwrap());
  assert!(s.insert_group_membership(group.id, other.id).await.unwrap().is_some());
}

#[tokio::test]
async fn wishlist_names_are_unique_among_live_rows() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;

  let first = s
    .insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![])
    .await
    .unwrap()
    .unwrap();
  assert!(
    s.insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![])
      .await
      .unwrap()
      .is_none()
  );
  assert_eq!(
    s.count_live_wishlists_named(owner.id, "Birthday".into()).await.unwrap(),
    1
  );

  s.disable(EntityKind::Wishlist, first.id.0).await.unwrap();
  assert!(s.get_wishlist(first.id).await.unwrap().is_none());
  assert!(s.list_wishlists_by_owner(owner.id).await.unwrap().is_empty());
  assert!(
    s.insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![])
      .await
      .unwrap()
      .is_some()
  );
}

#[tokio::test]
async fn wishlist_and_shares_are_written_together() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let group = s
    .insert_group(owner.id, NewGroup { name: "Family".into(), description: String::new() })
    .await
    .unwrap();

  // The second share points at no group, so the whole insert fails.
  let failed = s
    .insert_wishlist(
      owner.id,
      "Birthday".into(),
      String::new(),
      vec![group.id, GroupId(999)],
    )
    .await;
  assert!(failed.is_err());
  assert!(s.list_wishlists_by_owner(owner.id).await.unwrap().is_empty());
  assert!(s.get_wishlist(WishlistId(1)).await.unwrap().is_none());
  assert!(s.list_wishlists_for_group(group.id).await.unwrap().is_empty());

  let list = s
    .insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![group.id])
    .await
    .unwrap()
    .unwrap();
  let shares = s.list_wishlist_memberships(list.id).await.unwrap();
  assert_eq!(shares.len(), 1);
  assert_eq!(shares[0].group, group.id);
}

#[tokio::test]
async fn disabled_group_hides_its_shares() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let group = s
    .insert_group(owner.id, NewGroup { name: "Family".into(), description: String::new() })
    .await
    .unwrap();
  let list = s
    .insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![])
    .await
    .unwrap()
    .unwrap();
  s.insert_wishlist_membership(list.id, group.id).await.unwrap().unwrap();
  assert!(s.insert_wishlist_membership(list.id, group.id).await.unwrap().is_none());
  assert_eq!(s.list_wishlist_memberships(list.id).await.unwrap().len(), 1);

  s.disable(EntityKind::Group, group.id.0).await.unwrap();
  assert!(s.list_wishlist_memberships(list.id).await.unwrap().is_empty());
  assert!(s.list_groups_for_member(owner.id).await.unwrap().is_empty());
}

// ─── Wishes and claims ───────────────────────────────────────────────────────

#[tokio::test]
async fn one_live_claim_per_wish() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let bob = registered(&s, "bob@example.com", "BBBBBB").await;
  let carol = registered(&s, "carol@example.com", "CCCCCC").await;
  let list = s
    .insert_wishlist(owner.id, "Birthday".into(), String::new(), vec![])
    .await
    .unwrap()
    .unwrap();
  let wish = s
    .insert_wish(list.id, owner.id, NewWish {
      name: "Bicycle".into(),
      note: "red".into(),
      url:  String::new(),
    })
    .await
    .unwrap()
    .unwrap();

  let claim = s.insert_claim(wish.id, bob.id).await.unwrap().unwrap();
  assert!(s.insert_claim(wish.id, carol.id).await.unwrap().is_none());
  assert_eq!(s.get_live_claim(wish.id).await.unwrap(), Some(claim));

  assert_eq!(s.release_claim(wish.id, carol.id).await.unwrap(), 0);
  assert_eq!(s.release_claim(wish.id, bob.id).await.unwrap(), 1);
  assert!(s.get_live_claim(wish.id).await.unwrap().is_none());
  assert!(s.insert_claim(wish.id, carol.id).await.unwrap().is_some());
}

#[tokio::test]
async fn wish_names_are_scoped_to_their_wishlist() {
  let s = store().await;
  let owner = registered(&s, "ada@example.com", "AAAAAA").await;
  let a = s
    .insert_wishlist(owner.id, "A".into(), String::new(), vec![])
    .await
    .unwrap()
    .unwrap();
  let b = s
    .insert_wishlist(owner.id, "B".into(), String::new(), vec![])
    .await
    .unwrap()
    .unwrap();
  let wish = |name: &str| NewWish { name: name.into(), note: String::new(), url: String::new() };

  assert!(s.insert_wish(a.id, owner.id, wish("Book")).await.unwrap().is_some());
  assert!(s.insert_wish(b.id, owner.id, wish("Book")).await.unwrap().is_some());
  assert!(s.insert_wish(a.id, owner.id, wish("Book")).await.unwrap().is_none());
  assert_eq!(s.list_wishes(a.id).await.unwrap().len(), 1);
  assert!(s.get_wish(WishId(999)).await.unwrap().is_none());
}
