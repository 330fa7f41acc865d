use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_marketplace::config::environment::EnvironmentConfig;
use rental_marketplace::database;
use rental_marketplace::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use rental_marketplace::routes::create_app_router;
use rental_marketplace::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Rental Marketplace - Booking API");
    info!("===================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::from_env();
    let app_state = AppState::new(pool, config.clone());

    // CORS permisivo solo fuera de producción
    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = create_app_router(app_state).layer(cors);

    // Dirección del servidor
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🚗 Endpoints - Vehículos (público):");
    info!("   GET  /api/vehicles - Buscar vehículos aprobados");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("📅 Endpoints - Reservas (customer):");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Listar reservas propias");
    info!("   PUT  /api/bookings/:id/cancel - Cancelar reserva");
    info!("🧰 Endpoints - Propietario (owner):");
    info!("   POST /api/owner/vehicles - Registrar vehículo");
    info!("   GET  /api/owner/vehicles - Listar vehículos propios");
    info!("   PUT  /api/owner/vehicles/:id - Actualizar vehículo");
    info!("   DELETE /api/owner/vehicles/:id - Eliminar vehículo");
    info!("   POST /api/owner/vehicles/:id/block-dates - Bloquear fechas");
    info!("   DELETE /api/owner/vehicles/:id/block-dates - Desbloquear fechas");
    info!("   GET  /api/owner/vehicles/:id/block-dates - Listar bloqueos");
    info!("   GET  /api/owner/bookings - Reservas sobre vehículos propios");
    info!("   PUT  /api/owner/bookings/:booking_id/:status - Transición de reserva");
    info!("🛡️ Endpoints - Admin:");
    info!("   GET  /api/admin/vehicles/pending - Vehículos pendientes");
    info!("   PUT  /api/admin/vehicles/:id/approve - Aprobar vehículo");
    info!("   PUT  /api/admin/vehicles/:id/reject - Rechazar vehículo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
