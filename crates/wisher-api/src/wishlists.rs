//! Handlers for `/wishlists` and `/wishlist-memberships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/wishlists` | Wishlists the caller owns |
//! | `POST`   | `/wishlists` | Body: `{"name":"Birthday","groups":[1]}` |
//! | `GET`    | `/wishlists/{id}` | Owner or a member of a sharing group |
//! | `DELETE` | `/wishlists/{id}` | Owner only |
//! | `GET`    | `/wishlists/{id}/members` | Users reaching it through a group |
//! | `POST`   | `/wishlists/{id}/groups` | Body: `{"group":1}`; owner only |
//! | `DELETE` | `/wishlist-memberships/{id}` | Owner only |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use wisher_core::{
  Service,
  id::{GroupId, WishlistId, WishlistMembershipId},
  store::WishStore,
  user::User,
  wishlist::{NewWishlist, Wishlist, WishlistView},
};

use crate::{auth::Actor, error::ApiError};

/// `GET /wishlists`
pub async fn list<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<Wishlist>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_wishlists(actor).await?))
}

/// `POST /wishlists`
pub async fn create<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Json(body): Json<NewWishlist>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let view = service.create_wishlist(actor, body).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /wishlists/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishlistId>,
) -> Result<Json<WishlistView>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.get_wishlist(actor, id).await?))
}

/// `DELETE /wishlists/{id}`
pub async fn disable<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishlistId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.disable_wishlist(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /wishlists/{id}/members`
pub async fn members<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishlistId>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_wishlist_members(actor, id).await?))
}

// ─── Shares ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ShareBody {
  pub group: GroupId,
}

/// `POST /wishlists/{id}/groups`
pub async fn share<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishlistId>,
  Json(body): Json<ShareBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let membership = service.share_wishlist(actor, id, body.group).await?;
  Ok((StatusCode::CREATED, Json(membership)))
}

/// `DELETE /wishlist-memberships/{id}`
pub async fn unshare<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<WishlistMembershipId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.unshare_wishlist(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
