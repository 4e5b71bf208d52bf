//! Wellbeing audit HTTP server.

use std::env;
use std::error::Error;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wellbeing_audit::api::{AppState, create_router};
use wellbeing_audit::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        env::var("AUDIT_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr =
        env::var("AUDIT_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(bind_addr.as_str()).await?;
    info!(addr = %bind_addr, config_dir = %config_dir, "Wellbeing audit listening");
    axum::serve(listener, app).await?;

    Ok(())
}
