mod backend;
mod config;
mod coordinator;
mod errors;
mod models;
mod routes;
mod state;
mod views;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::HttpProfileBackend;
use crate::config::Config;
use crate::coordinator::ProfileCoordinator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profile coordinator v{}", env!("CARGO_PKG_VERSION"));

    // Bind the profile engine; an empty BACKEND_URL runs detached
    let coordinator = if config.backend_url.trim().is_empty() {
        warn!("BACKEND_URL is empty; every profile capability will be unavailable");
        Arc::new(ProfileCoordinator::detached())
    } else {
        let backend =
            HttpProfileBackend::new(config.backend_url.clone(), config.backend_timeout);
        info!(
            "Profile backend bound to {} (timeout {:?})",
            config.backend_url, config.backend_timeout
        );
        Arc::new(ProfileCoordinator::new(Arc::new(backend)))
    };

    // Initial status and profile fetch; an unreachable engine is not fatal
    match coordinator.load().await {
        Ok(snapshot) => info!(
            "Loaded profile state (hasProfile={}, profileMode={})",
            snapshot.status.has_profile, snapshot.status.profile_mode
        ),
        Err(e) => warn!("Initial profile load failed: {e}"),
    }

    let state = AppState {
        coordinator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the desktop shell

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
