//! Clause API Server
//!
//! Segments uploaded contracts into clauses and analyzes them through the
//! resilient provider pipeline. Provides REST endpoints for:
//!
//! - Contract upload and clause listing
//! - Streaming clause analysis (server-sent events)
//! - Document risk summary
//! - Ad hoc clause analysis
//! - Translation of analysis content
//!
//! Analysis providers are optional: with no provider configured every clause
//! is analyzed by the local rule set.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use analysis_core::{InferenceApiConfig, PipelineConfig, RemoteModelConfig};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use translate_core::TranslationConfig;

mod api;
mod error;
mod extract;
mod session;
mod state;
mod store;

use state::AppState;

/// Command-line arguments for the clause API server
#[derive(Parser, Debug)]
#[command(name = "clause-api")]
#[command(about = "Contract clause segmentation and risk analysis server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Timeout for every outbound provider call, in milliseconds
    #[arg(long, env = "PROVIDER_TIMEOUT_MS", default_value = "15000")]
    provider_timeout_ms: u64,

    /// Clauses analyzed concurrently per batch
    #[arg(long, env = "BATCH_SIZE", default_value = "3")]
    batch_size: usize,

    /// Base URL of the hosted model app (call/poll protocol)
    #[arg(long, env = "REMOTE_MODEL_URL")]
    remote_model_url: Option<String>,

    /// Endpoint name of the hosted model app
    #[arg(long, env = "REMOTE_MODEL_API", default_value = "analyze_legal_clause")]
    remote_model_api: String,

    /// Text-generation inference endpoint
    #[arg(long, env = "INFERENCE_API_URL")]
    inference_api_url: Option<String>,

    /// Token for the model services
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,

    /// Base URL of the primary (opus-mt) translation models
    #[arg(long, env = "TRANSLATION_API_URL")]
    translation_api_url: Option<String>,

    /// Base URL of the general-purpose translation API
    #[arg(long, env = "TRANSLATION_FALLBACK_URL")]
    translation_fallback_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_provider_timeout(Duration::from_millis(self.provider_timeout_ms))
            .with_batch_size(self.batch_size);

        if let Some(url) = &self.remote_model_url {
            config = config.with_remote_model(
                RemoteModelConfig::new(url)
                    .with_api_name(&self.remote_model_api)
                    .with_token(self.hf_token.clone()),
            );
        }

        if let Some(url) = &self.inference_api_url {
            config = config
                .with_inference_api(InferenceApiConfig::new(url).with_token(self.hf_token.clone()));
        }

        config
    }

    fn translation_config(&self) -> TranslationConfig {
        let mut config = TranslationConfig::disabled();

        if let Some(url) = &self.translation_api_url {
            config = config.with_primary(url, self.hf_token.clone());
        }
        if let Some(url) = &self.translation_fallback_url {
            config = config.with_secondary(url);
        }

        config
    }
}

/// Build the router with all routes and middleware
fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(api::handle_health))
        // Contracts
        .route("/api/contracts", post(api::handle_create_contract))
        .route("/api/contracts/raw", post(api::handle_upload_contract))
        .route("/api/contracts/:id/clauses", get(api::handle_get_clauses))
        .route("/api/contracts/:id/analyze/stream", get(api::handle_analyze_stream))
        .route(
            "/api/contracts/:id/clauses/:clause_id/analyze",
            post(api::handle_reanalyze_clause),
        )
        .route(
            "/api/contracts/:id/clauses/:clause_id/analysis",
            get(api::handle_get_analysis),
        )
        .route("/api/contracts/:id/summary", get(api::handle_summary))
        // Free-standing operations
        .route("/api/analyze", post(api::handle_analyze))
        .route("/api/translate", post(api::handle_translate))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clause API on {}:{}", args.host, args.port);

    let state = Arc::new(AppState::new(
        &args.pipeline_config(),
        &args.translation_config(),
    ));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Provider timeout: {}ms", args.provider_timeout_ms);
    info!("Batch size: {}", args.batch_size);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
