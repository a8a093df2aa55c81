//! Core types and the authorization engine for the Wisher wishlist service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the entities, the [`store::WishStore`] trait backends implement,
//! and the [`Service`] that decides who may see and change what.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod group;
pub mod guard;
pub mod id;
pub mod invite;
pub mod ledger;
pub mod lifecycle;
pub mod password;
pub mod resolver;
pub mod service;
pub mod store;
pub mod user;
pub mod visibility;
pub mod wish;
pub mod wishlist;

pub use error::{Error, Result};
pub use service::Service;
