use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use dotenvy::dotenv;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use gamboa_rental::config::EnvironmentConfig;
use gamboa_rental::database::create_pool;
use gamboa_rental::middleware::cors::cors_middleware;
use gamboa_rental::routes::{auth_routes, crm_routes, public_routes};
use gamboa_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Gamboa Rental Cars - API");
    info!("===========================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos (corre las migraciones pendientes)
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .merge(public_routes::create_public_router(&config))
        .nest("/auth", auth_routes::create_auth_router(app_state.clone()))
        .nest(
            "/crm",
            crm_routes::create_crm_router(app_state.clone(), &config),
        )
        .layer(cors_middleware(&config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Flota completa");
    info!("   GET  /buscar - Búsqueda con disponibilidad y cotización");
    info!("   POST /crm/public/reserve - Checkout público");
    info!("   GET  /crm/public/reserve/success - Confirmación de reserva");
    info!("   GET  /contrato - Contrato de alquiler");
    info!("🔑 Endpoints de autenticación:");
    info!("   POST /auth/login - Login del CRM");
    info!("   GET  /auth/me - Usuario actual");
    info!("   POST /auth/users - Crear usuario (admin)");
    info!("🗂  Endpoints del CRM (requieren JWT):");
    info!("   GET  /crm/ - Landing según rol");
    info!("   GET  /crm/dashboard - Estadísticas (admin)");
    info!("   CRUD /crm/cars, /crm/customers, /crm/reservations");
    info!("   GET  /crm/reservations/export - CSV de reservas");
    info!("   GET  /crm/calendar/events - Eventos del calendario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // ConnectInfo alimenta el rate limiting cuando no hay proxy adelante
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("No se pudo instalar el handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("No se pudo instalar el handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Señal de apagado recibida, cerrando el servidor");
}
