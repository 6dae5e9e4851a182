use anyhow::Result;
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use nhs_core::persist::load_dataset;
use nhs_core::{build_index, resolve, Analyzer, Dataset, InvertedIndex, LexiconAnalyzer};
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const DEFAULT_PORT: u16 = 1337;
pub const USAGE_MESSAGE: &str =
    "Usage: http://localhost/?q=<question> (e.g. http://localhost/?q=what are the symptoms of cancer?)";

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
    pub analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let analyzer = LexiconAnalyzer::new();
        let index = build_index(dataset, &analyzer);
        Self { index: Arc::new(index), analyzer: Arc::new(analyzer) }
    }
}

/// Loads and indexes the dataset, then builds the router. Fails if the dataset cannot be read.
pub fn build_app<P: AsRef<Path>>(dataset_path: P) -> Result<Router> {
    let path = dataset_path.as_ref();
    tracing::info!(path = %path.display(), "loading and indexing data");
    let dataset = load_dataset(path)?;
    Ok(router(AppState::from_dataset(&dataset)))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(query_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn query_handler(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    match question(raw.as_deref()) {
        Some(q) => {
            let url = resolve(&state.index, state.analyzer.as_ref(), &q);
            tracing::info!(question = %q, %url, "redirecting");
            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
        None => (StatusCode::OK, USAGE_MESSAGE).into_response(),
    }
}

/// The decoded `q` parameter, if present and not blank.
pub fn question(raw: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(raw?.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|q| !q.trim().is_empty())
}

/// Parses a port argument, falling back to [`DEFAULT_PORT`] with a warning.
pub fn port_or_default(raw: &str) -> u16 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(port = raw, default = DEFAULT_PORT, "bad port supplied, using default");
        DEFAULT_PORT
    })
}
