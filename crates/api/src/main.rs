//! Treasury API server binary entrypoint.

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use treasury_common::config::AppConfig;

use treasury_api::routes::create_router;
use treasury_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("treasury_api=debug,treasury_render=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting treasury API server...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = config.bind_addr;

    if !config.assets_dir.is_dir() {
        tracing::warn!(
            assets_dir = %config.assets_dir.display(),
            "Assets directory not found, cards will render without logos"
        );
    }

    // Build router
    let app = create_router(AppState::new(config))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    Ok(())
}
