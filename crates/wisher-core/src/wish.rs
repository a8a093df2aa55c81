//! Wishes and the claims other members place on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{UserId, WishClaimId, WishId, WishlistId},
  lifecycle::Lifecycle,
  user::User,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
  pub id:         WishId,
  pub wishlist:   WishlistId,
  pub owner:      UserId,
  /// Unique among the live wishes of the wishlist.
  pub name:       String,
  pub note:       String,
  pub url:        String,
  pub created_at: DateTime<Utc>,
  pub lifecycle:  Lifecycle,
}

/// "I am buying this." At most one live claim exists per wish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishClaim {
  pub id:         WishClaimId,
  pub wish:       WishId,
  pub user:       UserId,
  pub created_at: DateTime<Utc>,
  pub lifecycle:  Lifecycle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWish {
  pub name: String,
  #[serde(default)]
  pub note: String,
  #[serde(default)]
  pub url:  String,
}

/// A claim with the claimer's public profile attached.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
  pub claim:   WishClaim,
  /// Always redacted.
  pub claimer: User,
}

/// A wish as returned to one viewer. `claims` has already been filtered by
/// [`crate::visibility::claims_for_wish`] for that viewer.
#[derive(Debug, Clone, Serialize)]
pub struct WishView {
  pub wish:   Wish,
  /// Always redacted.
  pub owner:  User,
  pub claims: Vec<ClaimView>,
}
