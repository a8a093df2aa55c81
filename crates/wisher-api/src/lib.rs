//! JSON REST API for Wisher.
//!
//! Exposes an axum [`Router`] backed by a [`wisher_core::Service`] over any
//! [`wisher_core::store::WishStore`]. Every route except `POST /register`
//! authenticates with HTTP Basic `email:password`. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wisher_api::api_router(service.clone()))
//! ```

pub mod auth;
pub mod error;
pub mod groups;
pub mod invites;
pub mod users;
pub mod wishes;
pub mod wishlists;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use wisher_core::{Service, store::WishStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<Service<S>>) -> Router<()>
where
  S: WishStore + 'static,
{
  Router::new()
    // Users
    .route("/register", post(users::register::<S>))
    .route("/users", get(users::list::<S>))
    .route("/users/me", get(users::me::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Invites
    .route("/invites", get(invites::list::<S>).post(invites::create::<S>))
    .route("/invites/{id}", delete(invites::disable::<S>))
    // Groups
    .route("/groups", get(groups::list::<S>).post(groups::create::<S>))
    .route("/groups/{id}", get(groups::get_one::<S>).delete(groups::disable::<S>))
    .route("/groups/{id}/members", post(groups::add_member::<S>))
    .route("/groups/{id}/wishlists", get(groups::wishlists::<S>))
    .route("/group-memberships/{id}", delete(groups::remove_member::<S>))
    // Wishlists
    .route("/wishlists", get(wishlists::list::<S>).post(wishlists::create::<S>))
    .route(
      "/wishlists/{id}",
      get(wishlists::get_one::<S>).delete(wishlists::disable::<S>),
    )
    .route("/wishlists/{id}/members", get(wishlists::members::<S>))
    .route("/wishlists/{id}/groups", post(wishlists::share::<S>))
    .route("/wishlist-memberships/{id}", delete(wishlists::unshare::<S>))
    // Wishes and claims
    .route(
      "/wishlists/{id}/wishes",
      get(wishes::list::<S>).post(wishes::create::<S>),
    )
    .route("/wishes/{id}", get(wishes::get_one::<S>).delete(wishes::disable::<S>))
    .route(
      "/wishes/{id}/claim",
      post(wishes::claim::<S>).delete(wishes::unclaim::<S>),
    )
    .with_state(service)
}
