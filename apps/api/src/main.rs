mod compose;
mod config;
mod errors;
mod fonts;
mod layout;
mod llm_client;
mod provider;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ProviderKind};
use crate::fonts::FontResolver;
use crate::layout::FontStyle;
use crate::llm_client::LlmClient;
use crate::provider::{LayoutProvider, RemoteModelProvider, StubProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Overlay API v{}", env!("CARGO_PKG_VERSION"));

    let provider = build_provider(&config)?;
    info!("Layout provider: {}", provider.name());

    let fonts = FontResolver::new(config.font_config());
    for style in FontStyle::ALL {
        if let Some(path) = fonts.config().path(style) {
            info!("Font '{}' -> {}", style, path.display());
        }
    }

    let state = AppState {
        config: config.clone(),
        provider,
        fonts: Arc::new(fonts),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Chooses the layout provider once; handlers only ever see the trait object.
fn build_provider(config: &Config) -> Result<Arc<dyn LayoutProvider>> {
    match config.provider {
        ProviderKind::Stub => {
            info!("Using stub layouts; no model calls will be made");
            Ok(Arc::new(StubProvider))
        }
        ProviderKind::Remote => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY is required for the remote provider")?;
            let llm = LlmClient::new(
                api_key,
                &config.openai_base_url,
                config.openai_model.clone(),
            )
            .context("failed to build HTTP client for the model API")?;
            info!("LLM client initialized (model: {})", llm.model());
            Ok(Arc::new(RemoteModelProvider::new(llm)))
        }
    }
}
