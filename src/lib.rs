pub mod analysis; // Vision model proxy
pub mod api; // HTTP API
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline; // Leaf gate + disease picker

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use analysis::{AiGatewayClient, VisionGateway};
use config::ServerConfig;
use pipeline::detection::DetectionService;
use pipeline::picker::DiseaseCatalog;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Assemble the shared API context from configuration.
pub fn build_context(config: &ServerConfig) -> Result<api::ApiContext, String> {
    let conn = db::open_database(&config.database_path)
        .map_err(|e| format!("Cannot open database {}: {e}", config.database_path.display()))?;

    let gateway: Option<Arc<dyn VisionGateway>> = match &config.gateway_api_key {
        Some(key) => {
            let client = AiGatewayClient::new(
                &config.gateway_url,
                key,
                &config.gateway_model,
                config.gateway_timeout,
            )
            .map_err(|e| e.to_string())?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("AI_GATEWAY_API_KEY not set, vision analysis disabled");
            None
        }
    };

    let detection = DetectionService::with_catalog(Arc::new(DiseaseCatalog::wheat()));
    Ok(api::ApiContext::new(detection, gateway, conn))
}

/// [`build_context`] on the blocking pool. The gateway's blocking HTTP client
/// panics if constructed on an async worker thread.
pub async fn load_context(config: ServerConfig) -> Result<api::ApiContext, String> {
    tokio::task::spawn_blocking(move || build_context(&config))
        .await
        .map_err(|e| format!("Context setup task failed: {e}"))?
}

/// Run the server until Ctrl-C.
pub async fn run() -> Result<(), String> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    tracing::info!(
        bind = %config.bind_addr,
        database = %config.database_path.display(),
        model = %config.gateway_model,
        "Configuration loaded"
    );

    let bind_addr = config.bind_addr;
    let ctx = load_context(config).await?;
    let mut server = api::start_server(ctx, bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.wait().await;
    Ok(())
}
