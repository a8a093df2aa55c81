//! Handlers for wishes and claims.
//!
//! Claims are addressed through their wish: a wish has at most one live
//! claim, and the wish owner never learns of it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use wisher_core::{
  Service,
  id::{WishId, WishlistId},
  store::WishStore,
  wish::{NewWish, WishView},
};

use crate::{auth::Actor, error::ApiError};

// ─── Wishes ───────────────────────────────────────────────────────────────────

/// `GET /wishlists/{id}/wishes`
pub async fn list<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(wishlist): Path<WishlistId>,
) -> Result<Json<Vec<WishView>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_wishes(actor, wishlist).await?))
}

/// `POST /wishlists/{id}/wishes`
pub async fn create<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(wishlist): Path<WishlistId>,
  Json(body): Json<NewWish>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let view = service.create_wish(actor, wishlist, body).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /wishes/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishId>,
) -> Result<Json<WishView>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.get_wish(actor, id).await?))
}

/// `DELETE /wishes/{id}`
pub async fn disable<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.disable_wish(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Claims ───────────────────────────────────────────────────────────────────

/// `POST /wishes/{id}/claim`
pub async fn claim<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let claim = service.claim_wish(actor, id).await?;
  Ok((StatusCode::CREATED, Json(claim)))
}

/// `DELETE /wishes/{id}/claim`
pub async fn unclaim<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.unclaim_wish(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
