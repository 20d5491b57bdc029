use crate::domain::entities::{DisplayOptions, RequestConfig};
use crate::domain::error::{Error, Result};
use crate::domain::value_objects::{BodySource, HeaderSet, Timeout};
use std::path::PathBuf;

/// Turns flat command-line values into a `RequestConfig`
pub struct RequestConfigBuilder {
    method: String,
    url: Option<String>,
    headers: HeaderSet,
    body: BodySource,
    timeout: Timeout,
    follow_redirects: bool,
    bearer_token: Option<String>,
    basic_auth: Option<String>,
    output_file: Option<PathBuf>,
    display: DisplayOptions,
}

impl RequestConfigBuilder {
    pub fn new() -> Self {
        Self {
            method: "GET".to_string(),
            url: None,
            headers: HeaderSet::new(),
            body: BodySource::Empty,
            timeout: Timeout::default(),
            follow_redirects: false,
            bearer_token: None,
            basic_auth: None,
            output_file: None,
            display: DisplayOptions::default(),
        }
    }

    /// Any verb is accepted. It is upper-cased and passed through.
    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    pub fn url(mut self, raw_url: Option<&str>) -> Self {
        self.url = raw_url.map(str::to_string);
        self
    }

    pub fn headers(mut self, raw_headers: Option<&str>) -> Self {
        self.headers = HeaderSet::parse(raw_headers.unwrap_or_default());
        self
    }

    pub fn body(mut self, source: BodySource) -> Self {
        self.body = source;
        self
    }

    pub fn timeout(mut self, seconds: i64) -> Self {
        self.timeout = Timeout(seconds);
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn bearer_token(mut self, token: Option<&str>) -> Self {
        self.bearer_token = non_empty(token);
        self
    }

    pub fn basic_auth(mut self, pair: Option<&str>) -> Self {
        self.basic_auth = non_empty(pair);
        self
    }

    pub fn output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    /// Reads the body file if one was given and checks that a URL is present.
    pub fn build(self) -> Result<RequestConfig> {
        let body = self.body.resolve()?;
        let url = self.url.filter(|u| !u.is_empty()).ok_or_else(Error::url_required)?;

        Ok(RequestConfig {
            method: self.method,
            url,
            headers: self.headers,
            body,
            timeout: self.timeout,
            follow_redirects: self.follow_redirects,
            bearer_token: self.bearer_token,
            basic_auth: self.basic_auth,
            output_file: self.output_file,
            display: self.display,
        })
    }
}

impl Default for RequestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
