use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use notary_ledger::LedgerReader;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router. Everything except `/health` goes through the
/// versioned resolver.
pub fn build_router(ledger: Arc<dyn LedgerReader>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .fallback(handler::resolve_handler)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { ledger })
}
