//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los repositorios se construyen una vez con
//! el pool (o el almacén en memoria) y se comparten entre requests.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::{EnvironmentConfig, StorageBackend};
use crate::repositories::{
    AutoRepository, MemoryStore, PgAutoRepository, PgVentaRepository, VentaRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub autos: Arc<dyn AutoRepository>,
    pub ventas: Arc<dyn VentaRepository>,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn with_pool(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            config,
            autos: Arc::new(PgAutoRepository::new(pool.clone())),
            ventas: Arc::new(PgVentaRepository::new(pool)),
        }
    }

    /// Estado respaldado por el almacén en memoria
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        let store = MemoryStore::new();
        Self {
            config: EnvironmentConfig {
                storage_backend: StorageBackend::Memory,
                ..config
            },
            autos: Arc::new(store.clone()),
            ventas: Arc::new(store),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.config.storage_backend.as_str()
    }
}
