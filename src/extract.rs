use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Form,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// JSON request body decoded regardless of `Content-Type`. Any failure to
/// read or decode is a 400 `Invalid JSON`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "failed to read request body");
            ApiError::BadRequest("Invalid JSON")
        })?;
        let value = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "invalid json body");
            ApiError::BadRequest("Invalid JSON")
        })?;
        Ok(JsonBody(value))
    }
}

/// `axum::Form` with its rejections folded into a 400 `Invalid form`.
pub struct FormBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "invalid form body");
            ApiError::BadRequest("Invalid form")
        })?;
        Ok(FormBody(value))
    }
}
