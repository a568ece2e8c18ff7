mod cleanup;
mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod parser;
mod routes;
mod scoring;
mod sheets;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cleanup::{spawn_cleanup_task, TEMP_UPLOAD_DIR};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::{FitScorer, LlmFitScorer};
use crate::sheets::SheetsClient;
use crate::state::AppState;
use crate::store::ScreeningStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Parser API v{}", env!("CARGO_PKG_VERSION"));

    // Shared upload directory plus its recurring sweep
    std::fs::create_dir_all(TEMP_UPLOAD_DIR)?;
    spawn_cleanup_task();

    // Model client; requests that need it fail with 500 while it is absent
    let llm = config.openai_api_key.clone().map(LlmClient::new);
    match &llm {
        Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
        None => warn!("OPENAI_API_KEY not set — resume parsing and fit scoring unavailable"),
    }

    let scorer = llm
        .clone()
        .map(|client| Arc::new(LlmFitScorer::new(client)) as Arc<dyn FitScorer>);

    // Spreadsheet client; sheet writes fail with 500 while it is absent
    let sheets = match config.sheets_credentials_path.as_deref() {
        Some(path) => match SheetsClient::from_credentials_file(path) {
            Ok(client) => {
                info!("Google Sheets client initialized");
                Some(client)
            }
            Err(e) => {
                warn!("Failed to initialize Google Sheets client: {e}");
                None
            }
        },
        None => {
            warn!("GOOGLE_SHEETS_CREDENTIALS not set — spreadsheet sync disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        llm,
        sheets,
        scorer,
        store: Arc::new(ScreeningStore::default()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer()?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the React development server.
fn cors_layer() -> Result<CorsLayer> {
    Ok(CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}
