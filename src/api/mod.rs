mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::github::GithubClient;
use crate::summarizer::{self, Summarizer};

pub use error::ApiError;
pub use handlers::digest;

/// Shared, read-only state built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub github: GithubClient,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let github = GithubClient::from_config(&config)?;
        let summarizer = summarizer::from_config(&config)?;
        tracing::info!(
            "Digest mode: {}, summarizer: {}",
            config.mode.as_str(),
            summarizer.name()
        );

        Ok(Self {
            config: Arc::new(config),
            github,
            summarizer,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(handlers::summarize))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .with_state(state)
}
