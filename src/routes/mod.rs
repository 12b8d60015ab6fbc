//! Rutas HTTP
//!
//! Ensambla los routers de autos y ventas junto con los endpoints de servicio.

pub mod auto_routes;
pub mod venta_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_from_config;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_from_config(&state.config);
    let max_concurrent = state.config.max_concurrent_requests;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/autos", auto_routes::create_auto_router())
        .nest("/ventas", venta_routes::create_venta_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(GlobalConcurrencyLimitLayer::new(max_concurrent))
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "API Ventas de Autos" }))
}

/// Endpoint de salud
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "storage": state.backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
