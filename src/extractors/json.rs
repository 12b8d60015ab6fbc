use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use super::rejection_error;
use crate::utils::errors::AppError;

/// `Json<T>` cuyo rechazo (campo faltante, tipo incorrecto, fecha ilegible,
/// content-type ausente) es un `AppError` de 400.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| rejection_error(e.status(), e.body_text()))?;
        Ok(AppJson(value))
    }
}
