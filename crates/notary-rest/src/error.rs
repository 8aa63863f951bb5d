use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the read API.
///
/// Resolution errors carry the offending segment and the context path
/// accumulated up to it, so a message is self-explanatory without the
/// original request.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("A version specifier is required")]
    MissingVersionSpec,

    #[error("The version specifier \"{spec}\" is malformed")]
    MalformedVersionSpec { spec: String },

    #[error("The version specifier \"{spec}\" does not refer to a supported version")]
    UnsupportedVersionSpec { spec: String },

    #[error("The request in the context \"{context}\" is empty")]
    EmptyRequest { context: String },

    #[error("The element specifier \"{element}\" is not valid in the context \"{context}\"")]
    BadElementSpec { element: String, context: String },

    #[error("The identifier \"{id}\" is malformed in the context \"{context}\": {reason}")]
    BadIdentifier {
        id: String,
        context: String,
        reason: String,
    },

    #[error("The block identified by \"{id}\" cannot be found in the context \"{context}\"")]
    BlockNotFound { id: String, context: String },

    #[error("The entry identified by \"{id}\" cannot be found in the context \"{context}\"")]
    EntryNotFound { id: String, context: String },

    #[error("The specified resource cannot be returned as {media_type}")]
    NotAcceptable { media_type: String },

    #[error("The request parameters could not be parsed: {0}")]
    BadPostData(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] notary_ledger::LedgerError),
}

impl RestError {
    /// Stable name of the error kind, as exposed in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingVersionSpec => "MissingVersionSpec",
            Self::MalformedVersionSpec { .. } => "MalformedVersionSpec",
            Self::UnsupportedVersionSpec { .. } => "UnsupportedVersionSpec",
            Self::EmptyRequest { .. } => "EmptyRequest",
            Self::BadElementSpec { .. } => "BadElementSpec",
            Self::BadIdentifier { .. } => "BadIdentifier",
            Self::BlockNotFound { .. } => "BlockNotFound",
            Self::EntryNotFound { .. } => "EntryNotFound",
            Self::NotAcceptable { .. } => "NotAcceptable",
            Self::BadPostData(_) => "BadPOSTData",
            Self::Render(_) => "RenderFailed",
            Self::Ledger(_) => "LedgerUnavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingVersionSpec
            | Self::MalformedVersionSpec { .. }
            | Self::EmptyRequest { .. }
            | Self::BadElementSpec { .. }
            | Self::BadIdentifier { .. }
            | Self::BadPostData(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedVersionSpec { .. }
            | Self::BlockNotFound { .. }
            | Self::EntryNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Whether this error means "the addressed object does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound { .. } | Self::EntryNotFound { .. }
        )
    }
}

pub type RestResult<T> = Result<T, RestError>;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] notary_ledger::LedgerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub status: u16,
}

impl From<&RestError> for ErrorBody {
    fn from(err: &RestError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
            status: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody::from(&self);
        (status, axum::Json(body)).into_response()
    }
}
