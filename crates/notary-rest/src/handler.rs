use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Json, Response};
use notary_ledger::LedgerReader;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::accept::Format;
use crate::error::{RestError, RestResult};
use crate::render::{render, render_error};
use crate::request::{negotiate_format, parse_request};
use crate::resolve::resolve;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerReader>,
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub blocks: usize,
    pub base_offset: Option<u64>,
    pub head: Option<u64>,
}

/// Health handler.
pub async fn health_handler(State(state): State<AppState>) -> RestResult<Json<HealthResponse>> {
    let snapshot = state.ledger.snapshot()?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        blocks: snapshot.len(),
        base_offset: snapshot.first().map(|b| b.block_id.get()),
        head: snapshot.last().map(|b| b.block_id.get()),
    }))
}

/// Resolve any other request path against the current ledger snapshot.
pub async fn resolve_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request = body
        .map_err(|rejection| RestError::BadPostData(rejection.body_text()))
        .and_then(|body| parse_request(&method, &uri, &headers, &body));
    let request = match request {
        Ok(request) => request,
        Err(err) => {
            let format = negotiate_format(&uri, &headers).unwrap_or_default();
            return error_response(&uri, err, &format);
        }
    };
    debug!(
        %method,
        path = uri.path(),
        format = %request.format,
        form_keys = request.form.len(),
        "resolving request"
    );

    let snapshot = match state.ledger.snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => return error_response(&uri, err.into(), &request.format),
    };

    match resolve(&request.segments, &snapshot).and_then(|r| render(&r, &request.format)) {
        Ok(rendered) => rendered.into_response(),
        Err(err) => error_response(&uri, err, &request.format),
    }
}

fn error_response(uri: &Uri, err: RestError, format: &Format) -> Response {
    if err.is_not_found() {
        debug!(path = uri.path(), kind = err.kind(), "{err}");
    } else {
        warn!(path = uri.path(), kind = err.kind(), "request rejected: {err}");
    }
    render_error(&err, format).into_response()
}
