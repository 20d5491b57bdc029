use crate::application::auth::AuthAugmenter;
use crate::domain::entities::{RequestConfig, Response};
use crate::domain::error::{Error, Result};
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs exactly one exchange (plus redirect hops when asked to follow).
    async fn send(&self, config: &RequestConfig) -> Result<Response>;
}

/// Application service for the authenticate-then-send part of the pipeline
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Folds credentials into the header set. Must run before the request is
    /// displayed or sent.
    pub fn authorize(&self, config: &mut RequestConfig) -> Result<()> {
        AuthAugmenter::apply(config)
    }

    pub async fn send_request(&self, config: &RequestConfig) -> Result<Response> {
        RequestValidator::validate(config)?;
        tracing::debug!(method = %config.method, url = %config.url, "sending request");

        let response = self.http_client.send(config).await?;
        tracing::debug!(
            status = response.status,
            elapsed_ms = response.elapsed.as_millis() as u64,
            "received response"
        );
        Ok(response)
    }
}

/// The only structural rule: a URL must be present. Everything else is the
/// transport's call.
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(config: &RequestConfig) -> Result<()> {
        if config.url.is_empty() {
            return Err(Error::url_required());
        }
        Ok(())
    }
}
