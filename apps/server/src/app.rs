//! Application state and router assembly.

use std::sync::Arc;

use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use copyscan_annotate::AnnotateClient;
use copyscan_core::pipeline::CheckOrchestrator;
use copyscan_fetch::Fetcher;
use copyscan_search::SearchClient;
use copyscan_shared::{
    AnnotateConfig, AppConfig, FetchConfig, PipelineConfig, Result, SearchConfig, resolve_api_key,
};

use crate::routes;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) orchestrator: Arc<CheckOrchestrator>,
    /// Absent when no annotation API key is configured; the keyword
    /// endpoint reports that instead of failing at startup.
    pub(crate) annotate: Option<Arc<AnnotateClient>>,
}

/// Build the shared state from config.
pub(crate) fn build_state(config: &AppConfig) -> Result<AppState> {
    let search = SearchClient::new(&SearchConfig::from(config))?;
    let fetcher = Fetcher::new(&FetchConfig::from(config))?;
    let orchestrator = Arc::new(CheckOrchestrator::new(
        PipelineConfig::from(config),
        search,
        fetcher,
    ));

    let annotate = match resolve_api_key(config) {
        Ok(key) => Some(Arc::new(AnnotateClient::new(
            &AnnotateConfig::from(config),
            key,
        )?)),
        Err(e) => {
            warn!(error = %e, "keyword extraction disabled");
            None
        }
    };

    Ok(AppState {
        orchestrator,
        annotate,
    })
}

/// Build the axum router with all routes and middleware.
pub(crate) fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/check_plagiarism", post(routes::check_plagiarism))
        .route("/compare_files", post(routes::compare_files))
        .route("/extract_seo_keywords", post(routes::extract_seo_keywords))
        .route("/health", get(routes::health))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
