//! Strongly-typed integer identifiers, one per entity kind.
//!
//! All ids are SQLite row ids. The newtypes keep a `GroupId` from being passed
//! where a `WishlistId` is expected; on the wire they are plain integers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<$name> for i64 {
      fn from(id: $name) -> Self { id.0 }
    }
  };
}

id_type!(UserId);
id_type!(InviteId);
id_type!(GroupId);
id_type!(
  /// Identifies one (group, member) row, not the pair itself.
  GroupMembershipId
);
id_type!(WishlistId);
id_type!(
  /// Identifies one (wishlist, group) row, not the pair itself.
  WishlistMembershipId
);
id_type!(WishId);
id_type!(WishClaimId);
