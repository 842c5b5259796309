// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use erc7730_api::{
    api::create_router,
    config::Config,
    generator::{erc7730::Erc7730Generator, invoker::ensure_accepts},
    AppState, REQUIRED_GENERATOR_PARAMETERS,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn run_http_server(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;

    let app = create_router(state);

    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

// Returning the error gives a nonzero exit status, with the context chain on stderr.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erc7730_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    let generator = Erc7730Generator::new(config.generator_profile)
        .with_etherscan_api_url(config.etherscan_api_url.clone());

    // Fail fast rather than dropping mandatory arguments on every request
    ensure_accepts(&generator, REQUIRED_GENERATOR_PARAMETERS).context("Generator is incompatible")?;

    info!(
        "Using generator profile '{}' (version {}), error status mode '{}', cache home {}",
        config.generator_profile,
        config.generator_profile.version(),
        config.error_status_mode,
        config.cache_home.display()
    );

    let state = AppState::new(config, Arc::new(generator));

    run_http_server(state).await.inspect_err(|e| error!("❌ {:#}", e))
}
