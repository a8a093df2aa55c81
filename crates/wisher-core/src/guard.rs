//! Uniqueness guard: scoped uniqueness among live rows, checked before insert.
//!
//! Disabled rows never block a name or address. Backends also enforce these
//! keys when inserting, so a collision that slips past the check between two
//! concurrent writers still surfaces as the same [`Conflict`].

use crate::{
  Error, Result,
  error::Conflict,
  id::{UserId, WishlistId},
  store::WishStore,
};

pub async fn ensure_email_available<S>(store: &S, email: &str) -> Result<()>
where
  S: WishStore,
{
  let existing = store
    .find_user_by_email(email.to_owned())
    .await
    .map_err(Error::store)?;
  match existing {
    Some(_) => Err(Conflict::EmailInUse.into()),
    None => Ok(()),
  }
}

pub async fn ensure_wishlist_name_available<S>(
  store: &S,
  owner: UserId,
  name: &str,
) -> Result<()>
where
  S: WishStore,
{
  let count = store
    .count_live_wishlists_named(owner, name.to_owned())
    .await
    .map_err(Error::store)?;
  if count == 0 { Ok(()) } else { Err(Conflict::WishlistNameTaken.into()) }
}

pub async fn ensure_wish_name_available<S>(
  store: &S,
  wishlist: WishlistId,
  name: &str,
) -> Result<()>
where
  S: WishStore,
{
  let count = store
    .count_live_wishes_named(wishlist, name.to_owned())
    .await
    .map_err(Error::store)?;
  if count == 0 { Ok(()) } else { Err(Conflict::WishNameTaken.into()) }
}

/// Reject blank names before they reach the store.
pub fn require_name(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Invalid(format!("{field} must not be empty")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_names_are_invalid() {
    assert!(matches!(require_name("name", "   "), Err(Error::Invalid(m)) if m == "name must not be empty"));
    assert!(require_name("name", "Bicycle").is_ok());
  }
}
