use crate::domain::entities::RequestConfig;
use crate::domain::error::Result;
use crate::domain::value_objects::{BasicCredentials, HeaderSet};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const AUTHORIZATION: &str = "Authorization";

/// Derives the `Authorization` header from bearer or basic credentials
pub struct AuthAugmenter;

impl AuthAugmenter {
    /// Adds the authorization header to `config.headers`.
    ///
    /// A bearer token wins; basic credentials are only looked at when no
    /// token was given. With neither, the headers are left alone.
    pub fn apply(config: &mut RequestConfig) -> Result<()> {
        Self::augment(
            &mut config.headers,
            config.bearer_token.as_deref(),
            config.basic_auth.as_deref(),
        )
    }

    pub fn augment(headers: &mut HeaderSet, bearer: Option<&str>, basic: Option<&str>) -> Result<()> {
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            headers.replace(AUTHORIZATION, format!("Bearer {token}"));
            tracing::debug!("using bearer authorization");
        } else if let Some(pair) = basic.filter(|p| !p.is_empty()) {
            let credentials = BasicCredentials::parse(pair)?;
            headers.replace(AUTHORIZATION, Self::basic_value(&credentials));
            tracing::debug!("using basic authorization");
        }
        Ok(())
    }

    fn basic_value(credentials: &BasicCredentials) -> String {
        format!("Basic {}", STANDARD.encode(credentials.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Error;
    use std::sync::{Arc, Mutex};

    #[test]
    fn bearer_token_overwrites_existing_authorization() {
        let mut headers = HeaderSet::from([("Authorization", "Basic old"), ("Accept", "*/*")]);
        AuthAugmenter::augment(&mut headers, Some("abc"), None).unwrap();

        assert_eq!(headers.get("Authorization"), Some("Bearer abc"));
        assert_eq!(headers.get("Accept"), Some("*/*"));
    }

    #[test]
    fn bearer_replaces_differently_cased_header() {
        let mut headers = HeaderSet::from([("authorization", "Token zzz")]);
        AuthAugmenter::augment(&mut headers, Some("abc"), None).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn basic_auth_encodes_the_raw_pair() {
        let mut headers = HeaderSet::new();
        AuthAugmenter::augment(&mut headers, None, Some("alice:secret")).unwrap();

        assert_eq!(headers.get("Authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    }

    #[test]
    fn basic_auth_keeps_colons_in_the_password() {
        let mut headers = HeaderSet::new();
        AuthAugmenter::augment(&mut headers, None, Some("bob:a:b")).unwrap();

        assert_eq!(headers.get("Authorization"), Some("Basic Ym9iOmE6Yg=="));
    }

    #[test]
    fn malformed_basic_auth_fails() {
        let mut headers = HeaderSet::new();
        let err = AuthAugmenter::augment(&mut headers, None, Some("alice")).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "basic auth format should be 'user:pass'");
        assert!(headers.is_empty());
    }

    #[test]
    fn bearer_takes_precedence_over_basic() {
        let mut headers = HeaderSet::new();
        AuthAugmenter::augment(&mut headers, Some("tok"), Some("malformed")).unwrap();

        assert_eq!(headers.get("Authorization"), Some("Bearer tok"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn basic_auth_logging_names_only_the_scheme() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut headers = HeaderSet::new();
        tracing::subscriber::with_default(subscriber, || {
            AuthAugmenter::augment(&mut headers, None, Some("alice:secret")).unwrap();
        });

        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("using basic authorization"));
        assert!(!logged.contains("alice"));
        assert!(!logged.contains("secret"));
        assert!(!logged.contains("YWxpY2U6c2VjcmV0"));
    }

    #[test]
    fn no_credentials_leave_headers_untouched() {
        let mut headers = HeaderSet::from([("Authorization", "Custom x")]);
        AuthAugmenter::augment(&mut headers, None, None).unwrap();
        AuthAugmenter::augment(&mut headers, Some(""), Some("")).unwrap();

        assert_eq!(headers.get("Authorization"), Some("Custom x"));
    }
}
