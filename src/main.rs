use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_booking::build_app;
use rental_booking::config::environment::EnvironmentConfig;
use rental_booking::database::DatabaseConnection;
use rental_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental Booking API");
    info!("=========================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    let config = EnvironmentConfig::from_env();
    let server_url = config.server_url();
    let app_state = AppState::new(pool, config);
    let app = build_app(app_state);

    // HOST y PUERTO salen de la configuración (server_url = host:port)
    let addr: SocketAddr = server_url.parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🚗 Endpoints - Car:");
    info!("   POST /api/car - Publicar coche");
    info!("   GET  /api/car - Listar coches");
    info!("   GET  /api/car/:id - Obtener coche");
    info!("   PUT  /api/car/:id - Actualizar coche (dueño)");
    info!("   DELETE /api/car/:id - Eliminar coche (dueño)");
    info!("   GET  /api/car/locations - Sucursales");
    info!("   GET  /api/car/search?from=&to= - Coches libres en la ventana");
    info!("📅 Endpoints - Booking:");
    info!("   POST /api/booking - Crear reserva");
    info!("   GET  /api/booking - Mis reservas");
    info!("   GET  /api/booking/:id - Obtener reserva");
    info!("   PUT  /api/booking/:id - Modificar fechas");
    info!("   PUT  /api/booking/:id/confirm - Confirmar");
    info!("   PUT  /api/booking/:id/cancel - Cancelar");
    info!("   GET  /api/booking/car/:car_id - Reservas activas del coche");
    info!("   GET  /api/booking/car/:car_id/availability?start=&end= - Disponibilidad");
    info!("   GET  /api/booking/car/:car_id/ranges - Rangos ocupados");
    info!("💬 Endpoints - Feedback:");
    info!("   POST /api/feedback - Dejar feedback");
    info!("   GET  /api/feedback/car/:car_id - Feedback de un coche");

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
