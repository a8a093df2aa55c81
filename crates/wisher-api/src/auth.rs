//! HTTP Basic-auth extractor resolving the acting user.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use wisher_core::{Service, id::UserId, store::WishStore};

use crate::error::ApiError;

/// The authenticated user on whose behalf a request acts.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub UserId);

/// Split a `Basic` authorization header into `(email, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthenticated)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthenticated)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthenticated)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthenticated)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthenticated)?;
  Ok((email.to_owned(), password.to_owned()))
}

impl<S> FromRequestParts<Arc<Service<S>>> for Actor
where
  S: WishStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    service: &Arc<Service<S>>,
  ) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(&parts.headers)?;
    let user = service.authenticate(&email, &password).await?;
    Ok(Actor(user.id))
  }
}
