//! Application wiring: shared state, router, and the listener loop.

use crate::ai::{ContentService, GeminiContentClient};
use crate::handler;
use crate::models::Config;
use crate::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Process-wide, read-only state shared by every request.
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<Config>,
    provider: Option<Arc<dyn ContentService>>,
}

impl RelayState {
    /// Build state around an explicit provider. `None` means unconfigured.
    pub fn new(config: Config, provider: Option<Arc<dyn ContentService>>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Build state from config, constructing the Gemini client once when a key is present.
    pub fn from_config(config: Config) -> Self {
        let provider = match config.gemini_api_key.clone() {
            Some(api_key) => {
                info!(
                    "Content provider: Gemini (model: {})",
                    config.gemini_model
                );
                let client = GeminiContentClient::new(api_key, config.gemini_model.clone())
                    .with_base_url(config.gemini_base_url.clone());
                Some(Arc::new(client) as Arc<dyn ContentService>)
            }
            None => {
                warn!("GEMINI_API_KEY is not set; every relay request will fail with 500");
                None
            }
        };

        Self::new(config, provider)
    }

    pub fn provider(&self) -> Option<&Arc<dyn ContentService>> {
        self.provider.as_ref()
    }
}

/// Build the router for the configured variant.
pub fn build_router(state: RelayState) -> Router {
    let variant = state.config.variant;
    let max_body_bytes = state.config.max_body_bytes;

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route(variant.route(), any(handler::relay));

    if variant.cors_enabled() {
        router = router
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST, OPTIONS"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            ));
    }

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Bind the listener and serve until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| crate::Error::Config(format!("Invalid listen address: {}", e)))?;
    let variant = config.variant;

    let app = build_router(RelayState::from_config(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("gemini-relay ({} variant) listening on {}", variant, addr);
    info!("Relay route: POST {}", variant.route());

    axum::serve(listener, app).await?;
    Ok(())
}
