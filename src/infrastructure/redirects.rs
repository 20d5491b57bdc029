use crate::domain::error::{Error, Result};
use crate::infrastructure::http_client::PreparedRequest;

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, LOCATION};
use http::{Method, StatusCode, Uri};
use hyper::body::Bytes;

/// Hops followed before giving up when redirects are enabled.
pub const MAX_REDIRECTS: usize = 10;

/// Decides whether and where a response redirects to
pub struct RedirectPolicy;

impl RedirectPolicy {
    /// Returns the follow-up request for a redirect response, or `None` when
    /// the response should be handed back as is.
    ///
    /// # Errors
    ///
    /// `Error::Network` when the `Location` header cannot be resolved to a URL.
    pub fn next_request(
        current: &PreparedRequest,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Result<Option<PreparedRequest>> {
        if !Self::is_redirect(status) {
            return Ok(None);
        }

        let Some(location) = headers.get(LOCATION).and_then(|v| v.to_str().ok()) else {
            return Ok(None);
        };
        if location.is_empty() {
            return Ok(None);
        }

        let target = resolve_location(&current.uri, location)?;
        Ok(Some(Self::follow_up(current, status, target)))
    }

    fn is_redirect(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::SEE_OTHER
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        )
    }

    /// 307/308 replay the request as is. 303 always becomes GET, and so do
    /// 301/302 for anything other than GET or HEAD. Switching to GET drops the
    /// body along with its content headers.
    fn follow_up(current: &PreparedRequest, status: StatusCode, target: Uri) -> PreparedRequest {
        let keep_method = match status {
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => true,
            StatusCode::SEE_OTHER => current.method == Method::HEAD,
            _ => current.method == Method::GET || current.method == Method::HEAD,
        };

        let mut next = current.clone();
        if !keep_method {
            next.method = Method::GET;
            next.body = Bytes::new();
            next.headers.remove(CONTENT_TYPE);
            next.headers.remove(CONTENT_LENGTH);
        }

        if current.uri.host() != target.host() {
            next.headers.remove(AUTHORIZATION);
        }
        next.uri = target;
        next
    }
}

/// Resolves a `Location` value, absolute or relative, against the URL that
/// produced it.
pub fn resolve_location(base: &Uri, location: &str) -> Result<Uri> {
    let invalid = |reason: String| Error::Network(format!("invalid redirect location {location:?}: {reason}"));

    let base = url::Url::parse(&base.to_string()).map_err(|e| invalid(e.to_string()))?;
    let joined = base.join(location).map_err(|e| invalid(e.to_string()))?;
    joined
        .as_str()
        .parse::<Uri>()
        .map_err(|e| invalid(e.to_string()))
}
