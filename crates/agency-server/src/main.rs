mod routes;

use agency::Config;
use anyhow::{Context, Result};
use routes::{router, ServerState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = Config::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    apply_env_overrides(&mut config);

    info!(
        site = %config.site.name,
        storage = ?config.storage.backend,
        "agency starting"
    );

    let store = config.storage.open()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router(ServerState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// `AGENCY_HOST` and `AGENCY_PORT` take precedence over agency.toml
fn apply_env_overrides(config: &mut Config) {
    if let Ok(host) = std::env::var("AGENCY_HOST") {
        config.server.host = host;
    }

    if let Ok(port) = std::env::var("AGENCY_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid AGENCY_PORT"),
        }
    }
}
