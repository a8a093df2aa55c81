//! Handlers for registration and the user directory.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Unauthenticated; spends an invite code |
//! | `GET`  | `/users` | Every live user, redacted |
//! | `GET`  | `/users/me` | The caller, unredacted |
//! | `GET`  | `/users/{id}` | Redacted unless `id` is the caller |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use wisher_core::{
  Service,
  id::UserId,
  store::WishStore,
  user::{Registration, User},
};

use crate::{auth::Actor, error::ApiError};

/// `POST /register`
pub async fn register<S>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishStore + 'static,
{
  let user = service.register(body).await?;
  tracing::info!(user = %user.id, "registered new user");
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users`
pub async fn list<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.list_users(actor).await?))
}

/// `GET /users/me`
pub async fn me<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
) -> Result<Json<User>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.get_user(actor, actor).await?))
}

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<Service<S>>>,
  Actor(actor): Actor,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError>
where
  S: WishStore + 'static,
{
  Ok(Json(service.get_user(actor, id).await?))
}
