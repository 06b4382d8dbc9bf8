use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use maintenance_crm::config::EnvironmentConfig;
use maintenance_crm::database;
use maintenance_crm::middleware::cors::cors_middleware;
use maintenance_crm::routes;
use maintenance_crm::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Maintenance CRM - Registros y garantías");
    info!("==========================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Base de datos lista");

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/auth", routes::auth_routes::create_auth_router())
        .nest(
            "/records",
            routes::record_routes::create_record_router(app_state.clone()),
        )
        .nest(
            "/sales",
            routes::sales_routes::create_sales_router(app_state.clone()),
        )
        .nest(
            "/filters",
            routes::filter_routes::create_filter_router(app_state.clone()),
        )
        .nest(
            "/export",
            routes::export_routes::create_export_router(app_state.clone()),
        )
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /auth/login - Login por código de acceso");
    info!("📄 Registros (rol mantenimiento):");
    info!("   POST   /records - Crear registro");
    info!("   GET    /records - Listar con búsqueda, filtros y paginación");
    info!("   GET    /records/:id - Obtener registro");
    info!("   PATCH  /records/:id - Actualizar registro");
    info!("   DELETE /records/:id - Eliminar registro");
    info!("   GET    /records/history/:client_phone - Historial del cliente");
    info!("🛡️ Garantías (rol mantenimiento):");
    info!("   GET  /records/warranty/summary - Resumen por estado");
    info!("   GET  /records/warranty/out-of-warranty - Garantías vencidas");
    info!("   GET  /records/warranty/expiring-soon - Garantías por vencer");
    info!("📈 Ventas (rol ventas):");
    info!("   GET  /sales/records - Listado con rango de fechas");
    info!("   GET  /sales/summary - Resumen con desgloses y tendencias");
    info!("🔽 Filtros (cualquier rol):");
    info!("   GET  /filters/options - Opciones de los desplegables");
    info!("📤 Exportación:");
    info!("   GET  /export/records.{{csv,xlsx}} - Registros (mantenimiento)");
    info!("   GET  /export/sales.{{csv,xlsx}} - Ventas (rol ventas)");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!("Error del servidor: {}", e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "maintenance-crm",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
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
