use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use autos_ventas::config::environment::{EnvironmentConfig, StorageBackend};
use autos_ventas::database::DatabaseConnection;
use autos_ventas::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    // En desarrollo se muestra el módulo de origen de cada evento
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(config.is_development())
        .init();

    info!("🚗 API Ventas de Autos");
    info!("======================");
    info!("🌍 Entorno: {}", config.environment);
    info!("💾 Almacenamiento: {}", config.storage_backend.as_str());

    let app_state = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_connection = match DatabaseConnection::new(&config.database).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            AppState::with_pool(db_connection.pool().clone(), config.clone())
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria: los datos se pierden al reiniciar");
            AppState::in_memory(config.clone())
        }
    };

    let app = create_app(app_state);
    let addr = config.server_url();

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🚗 Endpoints - Autos:");
    info!("   POST   /autos - Crear auto");
    info!("   GET    /autos - Listar/buscar autos (skip, limit, marca, modelo)");
    info!("   GET    /autos/chasis/:numero_chasis - Buscar por chasis");
    info!("   GET    /autos/:id - Obtener auto");
    info!("   PUT    /autos/:id - Actualizar auto");
    info!("   DELETE /autos/:id - Eliminar auto (sin ventas)");
    info!("   GET    /autos/:id/with-ventas - Auto con sus ventas");
    info!("💰 Endpoints - Ventas:");
    info!("   POST   /ventas - Registrar venta");
    info!("   GET    /ventas - Listar/filtrar ventas (precio tiene prioridad sobre fechas)");
    info!("   GET    /ventas/auto/:auto_id - Ventas de un auto");
    info!("   GET    /ventas/comprador/:nombre - Ventas por comprador");
    info!("   GET    /ventas/:id - Obtener venta");
    info!("   PUT    /ventas/:id - Actualizar venta");
    info!("   DELETE /ventas/:id - Eliminar venta");
    info!("   GET    /ventas/:id/with-auto - Venta con su auto");

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
