use crate::domain::value_objects::{HeaderSet, Timeout};
use hyper::body::Bytes;
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

/// Which of the mutually exclusive response renderings applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    StatusOnly,
    Quiet,
    Normal,
}

/// Display switches as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub status_only: bool,
}

impl DisplayOptions {
    /// Status-only beats quiet, quiet beats normal. Verbose only modifies normal output.
    pub fn mode(&self) -> DisplayMode {
        if self.status_only {
            DisplayMode::StatusOnly
        } else if self.quiet {
            DisplayMode::Quiet
        } else {
            DisplayMode::Normal
        }
    }
}

/// Everything needed to send and render one request
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: String,
    pub url: String,
    pub headers: HeaderSet,
    /// Raw payload bytes. Empty means no body is sent.
    pub body: Bytes,
    pub timeout: Timeout,
    pub follow_redirects: bool,
    pub bearer_token: Option<String>,
    pub basic_auth: Option<String>,
    pub output_file: Option<PathBuf>,
    pub display: DisplayOptions,
}

impl RequestConfig {
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Reason phrase, possibly empty
    pub status_text: String,
    /// Names in the order first received, each with every value sent for it
    pub headers: Vec<(String, Vec<String>)>,
    pub body: Bytes,
    pub elapsed: Duration,
}

impl Response {
    pub fn status_line(&self) -> String {
        if self.status_text.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.status_text)
        }
    }

    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }
}
