use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::scoring::FitScorer;
use crate::sheets::SheetsClient;
use crate::store::ScreeningStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
///
/// The model client, fit scorer, and spreadsheet client are optional: each
/// is `None` when its credential is missing, and only the request that
/// actually needs it fails.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Option<LlmClient>,
    pub sheets: Option<SheetsClient>,
    pub scorer: Option<Arc<dyn FitScorer>>,
    pub store: Arc<ScreeningStore>,
}
