//! Claim visibility: who may learn that a wish has been claimed, and by whom.
//!
//! The owner of a wish must never see that it was claimed. Everyone else with
//! access sees the single live claim with the claimer's redacted profile.

use crate::{
  Error, Result,
  id::{UserId, WishId},
  lifecycle::EntityKind,
  resolver::Resolver,
  store::WishStore,
  wish::{ClaimView, Wish, WishClaim},
};

/// The claim `viewer` is allowed to see on `wish`, if any.
pub fn visible_claim(
  wish: &Wish,
  claim: Option<WishClaim>,
  viewer: UserId,
) -> Option<WishClaim> {
  if wish.owner == viewer {
    return None;
  }
  claim.filter(|c| c.wish == wish.id && c.lifecycle.is_live())
}

/// Claims on `wish` as seen by `viewer`: empty, or exactly one.
///
/// Does not check that `viewer` can read the wish at all; callers resolve
/// access first.
pub async fn claims_for_wish<S>(
  store: &S,
  wish: WishId,
  viewer: UserId,
) -> Result<Vec<ClaimView>>
where
  S: WishStore,
{
  let wish = store
    .get_wish(wish)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found(EntityKind::Wish, wish))?;
  claims_for_loaded_wish(store, &wish, viewer).await
}

/// As [`claims_for_wish`], for a wish already loaded.
pub async fn claims_for_loaded_wish<S>(
  store: &S,
  wish: &Wish,
  viewer: UserId,
) -> Result<Vec<ClaimView>>
where
  S: WishStore,
{
  if wish.owner == viewer {
    return Ok(Vec::new());
  }
  let claim = store.get_live_claim(wish.id).await.map_err(Error::store)?;
  let Some(claim) = visible_claim(wish, claim, viewer) else {
    return Ok(Vec::new());
  };

  let claimer = Resolver::new(store).profile(claim.user).await?;
  Ok(vec![ClaimView { claim, claimer }])
}
