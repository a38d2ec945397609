use std::future::Future;
use std::pin::Pin;

use crate::TransportError;

/// Supplies bearer credentials for platform API requests.
///
/// The host application implements this on top of its OAuth session store.
/// Using a trait keeps the transport decoupled from the auth framework and
/// testable with canned tokens.
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token.
    fn bearer_token(&self) -> Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send + '_>>;

    /// Called after a 401 response; returns a fresh token.
    fn refresh(&self) -> Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send + '_>>;
}

/// Token provider backed by a fixed token (CLI and tests).
///
/// `refresh` returns the same token, so a genuine authorization expiry
/// surfaces as a second 401 rather than looping.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send + '_>> {
        Box::pin(async move { Ok(self.token.clone()) })
    }

    fn refresh(&self) -> Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send + '_>> {
        Box::pin(async move { Ok(self.token.clone()) })
    }
}
