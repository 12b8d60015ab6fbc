//! Configuración de conexión a PostgreSQL
//!
//! Este módulo crea el pool de conexiones y aplica las migraciones embebidas.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

/// Conexión a la base de datos con su pool
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool y dejar el schema al día
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .with_context(|| format!("No se pudo conectar a {}", mask_database_url(&config.url)))?;

        run_migrations(&pool).await?;
        info!("✅ Base de datos lista");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ejecutar migraciones de la base de datos (crea las tablas `auto` y `venta`)
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Error ejecutando migraciones")?;
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    match rest.rfind('@') {
        Some(at_pos) => format!("{}***:***@{}", &url[..scheme_end + 3], &rest[at_pos + 1..]),
        None => url.to_string(),
    }
}
