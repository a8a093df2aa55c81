//! Handlers for `/groups` and `/group-memberships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/groups` | Groups the caller belongs to |
//! | `POST`   | `/groups` | Body: `{"name":"Family","description":""}` |
//! | `GET`    | `/groups/{id}` | Members and owner only |
//! | `DELETE` | `/groups/{id}` | Owner only |
//! | `POST`   | `/groups/{id}/members` | Body: `{"user":42}`; owner only |
//! | `GET`    | `/groups/{id}/wishlists` | Wishlists shared with the group |
//! | `DELETE` | `/group-memberships/{id}` | Group owner, or the member leaving |

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
  group::{Group, GroupView, NewGroup},
  id::{GroupId, GroupMembershipId, UserId},
  store::WishStore,
  wishlist::Wishlist,
};

use crate::{auth::Actor, error::ApiError};

// ─── Groups ───────────────────────────────────────────────────────────────────

/// `GET /groups`
pub async fn list<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<Group>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_groups(actor).await?))
}

/// `POST /groups`
pub async fn create<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Json(body): Json<NewGroup>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let view = service.create_group(actor, body).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /groups/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<GroupId>,
) -> Result<Json<GroupView>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.get_group(actor, id).await?))
}

/// `DELETE /groups/{id}`
pub async fn disable<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<GroupId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.disable_group(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /groups/{id}/wishlists`
pub async fn wishlists<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<GroupId>,
) -> Result<Json<Vec<Wishlist>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_group_wishlists(actor, id).await?))
}

// ─── Memberships ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddMemberBody {
  pub user: UserId,
}

/// `POST /groups/{id}/members`
pub async fn add_member<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<GroupId>,
  Json(body): Json<AddMemberBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let membership = service.add_group_member(actor, id, body.user).await?;
  Ok((StatusCode::CREATED, Json(membership)))
}

/// `DELETE /group-memberships/{id}`
pub async fn remove_member<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<GroupMembershipId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.remove_group_member(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
