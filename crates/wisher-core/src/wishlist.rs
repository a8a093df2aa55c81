//! Wishlists and the memberships that share them with groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  group::Group,
  id::{GroupId, UserId, WishlistId, WishlistMembershipId},
  lifecycle::Lifecycle,
  user::User,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
  pub id:          WishlistId,
  pub owner:       UserId,
  /// Unique among the owner's live wishlists.
  pub name:        String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub lifecycle:   Lifecycle,
}

/// Shares a wishlist with every live member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistMembership {
  pub id:         WishlistMembershipId,
  pub wishlist:   WishlistId,
  pub group:      GroupId,
  pub created_at: DateTime<Utc>,
  pub lifecycle:  Lifecycle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWishlist {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  /// Groups to share the new wishlist with straight away.
  #[serde(default)]
  pub groups:      Vec<GroupId>,
}

/// A wishlist as returned to someone with access to it.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistView {
  pub wishlist: Wishlist,
  /// Always redacted.
  pub owner:    User,
  pub shares:   Vec<ShareView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareView {
  pub membership: WishlistMembership,
  pub group:      Group,
}
