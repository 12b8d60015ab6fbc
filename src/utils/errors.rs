//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {}", describe_validation(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::Integrity(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Clasifica un error de sqlx: las violaciones de restricciones
    /// (unique, foreign key, check) pasan a `Integrity`, el resto queda como `Database`.
    pub fn from_sqlx(e: sqlx::Error, context: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Integrity(format!("{}: unique constraint violated", context));
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Integrity(format!("{}: foreign key constraint violated", context));
            }
            if db_err.is_check_violation() {
                return AppError::Integrity(format!("{}: check constraint violated", context));
            }
        }
        error!("{}: {}", context, e);
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let error_response = match self {
            AppError::Database(_) => ErrorResponse {
                error: "Database Error".to_string(),
                message: "An error occurred while accessing the database".to_string(),
                details: None,
                code: Some("DB_ERROR".to_string()),
            },

            AppError::Validation(e) => ErrorResponse {
                error: "Validation Error".to_string(),
                message: describe_validation(&e),
                details: Some(json!(e)),
                code: Some("VALIDATION_ERROR".to_string()),
            },

            AppError::NotFound(msg) => ErrorResponse {
                error: "Not Found".to_string(),
                message: msg,
                details: None,
                code: Some("NOT_FOUND".to_string()),
            },

            AppError::Conflict(msg) => ErrorResponse {
                error: "Conflict".to_string(),
                message: msg,
                details: None,
                code: Some("CONFLICT".to_string()),
            },

            AppError::Integrity(msg) => ErrorResponse {
                error: "Integrity Error".to_string(),
                message: msg,
                details: None,
                code: Some("INTEGRITY_ERROR".to_string()),
            },

            AppError::BadRequest(msg) => ErrorResponse {
                error: "Bad Request".to_string(),
                message: msg,
                details: None,
                code: Some("BAD_REQUEST".to_string()),
            },

            AppError::Internal(_) => ErrorResponse {
                error: "Internal Server Error".to_string(),
                message: "An unexpected error occurred".to_string(),
                details: None,
                code: Some("INTERNAL_ERROR".to_string()),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Resume los errores de validación en un único mensaje legible,
/// ordenado por campo para que sea determinista.
pub fn describe_validation(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} no encontrado", resource))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(field: &str) -> AppError {
    AppError::Conflict(format!("{} ya existe", field))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::field_error;

    #[test]
    fn test_status_codes() {
        assert_eq!(not_found_error("Auto").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(conflict_error("numero_chasis").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Integrity("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_describe_validation_is_sorted() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("precio", field_error("precio_positivo", "price must be positive"));
        errors.add("fecha_venta", field_error("fecha_no_futura", "future sale date"));

        assert_eq!(
            describe_validation(&errors),
            "future sale date; price must be positive"
        );
    }

    #[test]
    fn test_from_sqlx_keeps_non_constraint_errors() {
        let err = AppError::from_sqlx(sqlx::Error::PoolTimedOut, "Error creating auto");
        assert!(matches!(err, AppError::Database(_)));
    }
}
