//! Read-only HTTP API for the notary ledger.
//!
//! Requests address the ledger through a versioned grammar,
//! `/v{N}/blocks[/{blockId}[/entries[/{entryIndex}]]][.ext]`, and are answered
//! as JSON, XML, HTML, or plain text depending on the `Accept` header.
//!
//! Each request resolves against an immutable snapshot taken from the
//! [`notary_ledger::LedgerReader`] the server was built with.

pub mod accept;
pub mod config;
pub mod error;
pub mod handler;
pub mod path;
pub mod render;
pub mod request;
pub mod resolve;
pub mod router;
pub mod server;

pub use accept::{negotiate, Format};
pub use config::ServerConfig;
pub use error::{RestError, RestResult, ServerError, ServerResult};
pub use handler::{AppState, HealthResponse};
pub use path::{tokenize, Tokens};
pub use render::{render, render_error, Rendered};
pub use request::{negotiate_format, parse_request, FormValues, ParsedRequest};
pub use resolve::{resolve, Resolved, SUPPORTED_VERSIONS};
pub use server::NotaryServer;
