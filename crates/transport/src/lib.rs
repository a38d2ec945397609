//! Authenticated HTTP transport for the practice platform API.
//!
//! Wraps a [`reqwest::Client`] with bearer-token attachment (via
//! [`TokenProvider`]) and a single refresh-and-retry cycle on 401 responses.
//! Upload workflow logic lives in `docferry-upload`; this crate only moves
//! requests and responses.

mod body;
mod client;
mod token;

pub use body::{ByteProgressFn, progress_part};
pub use client::ApiClient;
pub use token::{StaticTokenProvider, TokenProvider};

/// Errors produced by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid base URL: {0}")]
    BaseUrl(String),

    #[error("token error: {0}")]
    Token(String),
}
