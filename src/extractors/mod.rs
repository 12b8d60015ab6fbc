//! Extractores de axum con rechazo tipado
//!
//! Envuelven `Json`, `Query` y `Path` para que cualquier error de
//! deserialización salga como `AppError` con el cuerpo JSON estándar.

pub mod json;
pub mod params;

pub use json::AppJson;
pub use params::{AppPath, AppQuery};

use axum::http::StatusCode;

use crate::utils::errors::AppError;

/// Un rechazo 4xx del framework pasa a `BadRequest`; uno 5xx es un fallo de
/// ruteo y queda como `Internal`.
pub(crate) fn rejection_error(status: StatusCode, body_text: String) -> AppError {
    if status.is_server_error() {
        AppError::Internal(body_text)
    } else {
        AppError::BadRequest(body_text)
    }
}
