use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use shapecheck::config::ServerConfig;
use shapecheck::models::{AppError, Result};
use shapecheck::server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting ShapeCheck server...");

    let config = ServerConfig::from_env();

    if let Err(e) = std::fs::create_dir_all(&config.upload_dir) {
        warn!("Failed to ensure upload directory exists: {}", e);
    }

    info!("Upload folder: {}", config.upload_dir.display());
    info!("Max file size: {}", config.max_size_label);

    let state = AppState::new(&config);
    let app = build_router(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Io(format!("Failed to bind to port {}: {}", config.port, e)))?;

    info!("Server listening on http://{}", bind_addr);
    info!("Access the web interface at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shapecheck=debug,tower_http=debug,axum=debug"));

    fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(filter)
        .init();
}
