//! Handlers for `/invites` endpoints. Administrators only.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use wisher_core::{Service, id::InviteId, invite::Invite, store::WishStore};

use crate::{auth::Actor, error::ApiError};

/// `GET /invites`
pub async fn list<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<Invite>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_invites(actor).await?))
}

/// `POST /invites`: issue a fresh code.
pub async fn create<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let invite = service.create_invite(actor).await?;
  Ok((StatusCode::CREATED, Json(invite)))
}

/// `DELETE /invites/{id}`
pub async fn disable<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<InviteId>,
) -> Result<StatusCode, ApiError>
where
  S: WishStore + 'static,
{
  service.disable_invite(actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
