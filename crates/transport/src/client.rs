use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{TokenProvider, TransportError};

/// Default request timeout. Chunk uploads move at most 5 MiB per request,
/// so a slow link still fits comfortably.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the platform API.
///
/// Attaches bearer credentials to every request and retries exactly once
/// after refreshing the token when the server answers 401.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Creates a client with the default timeout.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TransportError::BaseUrl(base_url.to_owned()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POSTs a JSON body and decodes a JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self
            .send_authorized(|| self.http.post(&url).json(body))
            .await?;
        let resp = Self::expect_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// POSTs a JSON body and discards the response body.
    pub async fn post_json_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), TransportError> {
        let url = self.url(path);
        let resp = self
            .send_authorized(|| self.http.post(&url).json(body))
            .await?;
        Self::expect_success(resp).await?;
        Ok(())
    }

    /// GETs a JSON response, mapping 404 and a literal `null` body to `None`.
    pub async fn get_json_opt<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<R>, TransportError> {
        let url = self.url(path);
        let resp = self.send_authorized(|| self.http.get(&url)).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::expect_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// GETs a JSON response.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, TransportError> {
        let url = self.url(path);
        let resp = self.send_authorized(|| self.http.get(&url)).await?;
        let resp = Self::expect_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// POSTs a multipart form and decodes a JSON response.
    ///
    /// Multipart bodies are single-use, so the caller supplies a factory and
    /// the form is rebuilt for the post-refresh retry.
    pub async fn post_multipart<R, F>(&self, path: &str, make_form: F) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
        F: Fn() -> Result<reqwest::multipart::Form, TransportError>,
    {
        let url = self.url(path);
        let token = self.tokens.bearer_token().await?;
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .multipart(make_form()?)
            .send()
            .await?;
        let resp = if resp.status() == StatusCode::UNAUTHORIZED {
            debug!(url = %url, "authorization expired, refreshing token and retrying");
            let token = self.tokens.refresh().await?;
            self.http
                .post(&url)
                .bearer_auth(&token)
                .multipart(make_form()?)
                .send()
                .await?
        } else {
            resp
        };
        let resp = Self::expect_success(resp).await?;
        Ok(resp.json().await?)
    }

    async fn send_authorized<F>(&self, build: F) -> Result<reqwest::Response, TransportError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let token = self.tokens.bearer_token().await?;
        let resp = build().bearer_auth(&token).send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }
        debug!("authorization expired, refreshing token and retrying");
        let token = self.tokens.refresh().await?;
        Ok(build().bearer_auth(&token).send().await?)
    }

    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
