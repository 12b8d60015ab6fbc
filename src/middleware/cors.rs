//! Middleware de CORS
//!
//! Por defecto se acepta cualquier origen; con `CORS_ORIGINS` se restringe
//! a la lista indicada.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::environment::EnvironmentConfig;

/// Elegir la política de CORS según la configuración
pub fn cors_from_config(config: &EnvironmentConfig) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) if !origins.is_empty() => cors_middleware_with_origins(origins),
        _ => cors_middleware(),
    }
}

/// CORS permisivo: cualquier origen, método y cabecera
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
