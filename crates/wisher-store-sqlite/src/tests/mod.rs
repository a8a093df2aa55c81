//! Integration tests for `SqliteStore` and the engine running on top of it,
//! against an in-memory database.

mod service;
mod store;

use wisher_core::{
  Service,
  group::{Group, NewGroup},
  id::GroupId,
  ledger::InviteLedger,
  user::{Registration, User},
  wish::{NewWish, WishView},
  wishlist::{NewWishlist, WishlistView},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn service() -> Service<SqliteStore> { Service::new(store().await) }

fn registration(email: &str, invite_code: &str) -> Registration {
  Registration {
    email:           email.into(),
    password:        "correct horse".into(),
    password_repeat: "correct horse".into(),
    first_name:      email.split('@').next().unwrap_or("user").into(),
    last_name:       "Tester".into(),
    invite_code:     invite_code.into(),
  }
}

/// Issue an invite and register `email` with it.
async fn user(svc: &Service<SqliteStore>, email: &str) -> User {
  let invite = InviteLedger::new(svc.store()).issue().await.unwrap();
  svc.register(registration(email, &invite.code)).await.unwrap()
}

async fn group(svc: &Service<SqliteStore>, owner: &User, name: &str) -> Group {
  svc
    .create_group(owner.id, NewGroup { name: name.into(), description: String::new() })
    .await
    .unwrap()
    .group
}

async fn wishlist(
  svc: &Service<SqliteStore>,
  owner: &User,
  name: &str,
  groups: Vec<GroupId>,
) -> WishlistView {
  svc
    .create_wishlist(owner.id, NewWishlist {
      name: name.into(),
      description: String::new(),
      groups,
    })
    .await
    .unwrap()
}

fn new_wish(name: &str) -> NewWish {
  NewWish { name: name.into(), note: String::new(), url: String::new() }
}

async fn wish(
  svc: &Service<SqliteStore>,
  owner: &User,
  list: &WishlistView,
  name: &str,
) -> WishView {
  svc
    .create_wish(owner.id, list.wishlist.id, new_wish(name))
    .await
    .unwrap()
}
