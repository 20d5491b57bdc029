use crate::application::services::HttpClient;
use crate::domain::entities::{RequestConfig, Response};
use crate::domain::error::{Error, Result};
use crate::infrastructure::redirects::{MAX_REDIRECTS, RedirectPolicy};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request as HyperRequest, Uri};
use hyper::body::{Bytes, Incoming};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Instant;

/// Infrastructure implementation of HttpClient using Hyper
/// This is the transport the application service delegates to
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HyperHttpClient {
    /// Builds a pooled client that speaks both `http://` and `https://`.
    pub fn new() -> Result<Self> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);

        let tls = tokio_native_tls::native_tls::TlsConnector::new()
            .map_err(|e| Error::RequestBuild(format!("TLS setup failed: {e}")))?;
        let connector = HttpsConnector::from((http, tokio_native_tls::TlsConnector::from(tls)));

        let client = Client::builder(TokioExecutor::new())
            .build::<HttpsConnector<HttpConnector>, Full<Bytes>>(connector);
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, config: &RequestConfig) -> Result<Response> {
        let exchange = self.exchange(config);

        match config.timeout.as_duration() {
            Some(limit) => tokio::time::timeout(limit, exchange).await.map_err(|_| {
                Error::Network(format!("request timed out after {}s", limit.as_secs()))
            })?,
            None => exchange.await,
        }
    }
}

impl HyperHttpClient {
    async fn exchange(&self, config: &RequestConfig) -> Result<Response> {
        let mut prepared = RequestAdapter::prepare(config)?;
        let start = Instant::now();
        let mut redirects = 0;

        loop {
            let hyper_response = self.execute_http_request(prepared.to_hyper_request()?).await?;

            if config.follow_redirects {
                let next = RedirectPolicy::next_request(
                    &prepared,
                    hyper_response.status(),
                    hyper_response.headers(),
                )?;

                if let Some(next) = next {
                    if redirects == MAX_REDIRECTS {
                        return Err(Error::Network(format!("stopped after {MAX_REDIRECTS} redirects")));
                    }
                    redirects += 1;
                    tracing::debug!(
                        status = hyper_response.status().as_u16(),
                        location = %next.uri,
                        hop = redirects,
                        "following redirect"
                    );
                    prepared = next;
                    continue;
                }
            }

            return ResponseAdapter::to_domain_response(hyper_response, start).await;
        }
    }

    async fn execute_http_request(
        &self,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>> {
        self.client
            .request(request)
            .await
            .map_err(|e| Error::Network(describe(&e)))
    }
}

/// A fully validated request that can be turned into a hyper request any
/// number of times, once per redirect hop.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl PreparedRequest {
    fn to_hyper_request(&self) -> Result<HyperRequest<Full<Bytes>>> {
        let mut builder = HyperRequest::builder()
            .method(self.method.clone())
            .uri(self.uri.clone());

        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers.clone();
        }

        builder
            .body(Full::new(self.body.clone()))
            .map_err(|e| Error::RequestBuild(e.to_string()))
    }
}

/// Adapter for converting a `RequestConfig` into a `PreparedRequest`
struct RequestAdapter;

impl RequestAdapter {
    fn prepare(config: &RequestConfig) -> Result<PreparedRequest> {
        let method = Method::from_bytes(config.method.as_bytes())
            .map_err(|_| Error::RequestBuild(format!("invalid method {:?}", config.method)))?;
        let uri = config
            .url
            .parse::<Uri>()
            .map_err(|e| Error::RequestBuild(format!("invalid URL {:?}: {e}", config.url)))?;

        let mut headers = HeaderAdapter::to_header_map(config)?;
        HeaderAdapter::add_json_content_type(&mut headers, config);

        Ok(PreparedRequest {
            method,
            uri,
            headers,
            body: BodyAdapter::to_bytes(&config.body),
        })
    }
}

/// Adapter for converting hyper responses into domain responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
        start: Instant,
    ) -> Result<Response> {
        let status = hyper_response.status();
        let status_text = Self::reason_phrase(&hyper_response);
        let headers = Self::group_headers(hyper_response.headers());

        let body = hyper_response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::BodyRead(describe(&e)))?
            .to_bytes();

        Ok(Response {
            status: status.as_u16(),
            status_text,
            headers,
            body,
            elapsed: start.elapsed(),
        })
    }

    /// Hyper only keeps the phrase on the wire when it differs from the
    /// canonical one.
    fn reason_phrase(response: &hyper::Response<Incoming>) -> String {
        response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
            .or_else(|| response.status().canonical_reason().map(str::to_string))
            .unwrap_or_default()
    }

    fn group_headers(headers: &HeaderMap) -> Vec<(String, Vec<String>)> {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match grouped.iter_mut().find(|(key, _)| key == name.as_str()) {
                Some((_, values)) => values.push(value),
                None => grouped.push((name.to_string(), vec![value])),
            }
        }
        grouped
    }
}

/// Adapter for converting the body string into hyper bytes
struct BodyAdapter;

impl BodyAdapter {
    fn to_bytes(body: &Bytes) -> Bytes {
        if body.is_empty() {
            Bytes::new()
        } else {
            body.clone()
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    /// Explicit headers replace anything hyper would set for the same name.
    fn to_header_map(config: &RequestConfig) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in config.headers.iter() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::RequestBuild(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::RequestBuild(format!("invalid value for header {name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn add_json_content_type(headers: &mut HeaderMap, config: &RequestConfig) {
        if config.has_body() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    }
}

/// Flattens an error and its sources into one line.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::request_builder::RequestConfigBuilder;
    use crate::domain::value_objects::HeaderSet;

    fn config(method: &str, body: &str, headers: &str) -> RequestConfig {
        let mut config = RequestConfigBuilder::new()
            .method(method)
            .url(Some("http://localhost:8080/items?id=1"))
            .headers(Some(headers))
            .build()
            .unwrap();
        config.body = Bytes::copy_from_slice(body.as_bytes());
        config
    }

    #[test]
    fn defaults_content_type_to_json_when_a_body_is_present() {
        let prepared = RequestAdapter::prepare(&config("POST", "{}", "")).unwrap();
        assert_eq!(prepared.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(prepared.body, Bytes::from_static(b"{}"));
    }

    #[test]
    fn never_defaults_content_type_without_a_body() {
        let prepared = RequestAdapter::prepare(&config("GET", "", "")).unwrap();
        assert!(prepared.headers.get(CONTENT_TYPE).is_none());
        assert!(prepared.body.is_empty());
    }

    #[test]
    fn explicit_content_type_is_kept_whatever_its_case() {
        let prepared = RequestAdapter::prepare(&config("POST", "a=1", "content-type:text/plain")).unwrap();
        assert_eq!(prepared.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(prepared.headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn extension_methods_pass_through() {
        let prepared = RequestAdapter::prepare(&config("PURGE", "", "")).unwrap();
        assert_eq!(prepared.method.as_str(), "PURGE");
    }

    #[test]
    fn malformed_method_is_a_build_error() {
        let err = RequestAdapter::prepare(&config("GE T", "", "")).unwrap_err();
        assert!(matches!(err, Error::RequestBuild(_)));
        assert!(err.to_string().starts_with("error creating request"));
    }

    #[test]
    fn malformed_url_is_a_build_error() {
        let mut config = config("GET", "", "");
        config.url = "http://exa mple.com/".into();
        assert!(matches!(RequestAdapter::prepare(&config), Err(Error::RequestBuild(_))));
    }

    #[test]
    fn invalid_header_value_is_a_build_error() {
        let mut config = config("GET", "", "");
        config.headers = HeaderSet::from([("X-Bad", "line\nbreak")]);
        assert!(matches!(RequestAdapter::prepare(&config), Err(Error::RequestBuild(_))));
    }

    #[test]
    fn groups_repeated_response_headers_in_order() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("content-type", HeaderValue::from_static("text/plain"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let grouped = ResponseAdapter::group_headers(&headers);
        let cookies = grouped.iter().find(|(name, _)| name == "set-cookie").unwrap();
        assert_eq!(cookies.1, vec!["a=1".to_string(), "b=2".to_string()]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn describe_includes_the_cause_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = Error::FileRead {
            path: "x".into(),
            source: inner,
        };
        assert_eq!(describe(&outer), "error reading file x: connection refused");
    }
}
