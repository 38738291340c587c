mod chat;
mod config;
mod error;
mod gateway;
mod history;
mod routes;
mod session;
mod state;
mod tasks;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

const DEFAULT_CONFIG_PATHS: &[&str] = &["conf.yaml", "conf.yml", "conf.json"];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studybuddy_backend=debug,tower_http=debug")),
        )
        .init();

    let config = load_config()?;

    let app_state = AppState::new(config.clone())?;

    let app = Router::new()
        .merge(routes::create_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let host: std::net::IpAddr = config.system.host.parse()?;
    let addr = SocketAddr::from((host, config.system.port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `CONFIG_PATH` must load if set; otherwise the first existing default file
/// is used, and built-in defaults apply when there is none.
fn load_config() -> Result<Config> {
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        let config = Config::load(&path)?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    for path in DEFAULT_CONFIG_PATHS {
        if Path::new(path).exists() {
            let config = Config::load(path)?;
            info!("Loaded configuration from: {}", path);
            return Ok(config);
        }
        tracing::debug!("No config file at {}", path);
    }

    info!("No configuration file found, using defaults");
    Ok(Config::default())
}
