use crate::domain::error::{Error, Result};
use hyper::body::Bytes;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Request headers keyed by name exactly as the user typed it.
///
/// Later inserts under the same name overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Key:Value,Key2:Value2` list
    ///
    /// # Arguments
    /// * `raw` - The comma-separated header list from the command line
    ///
    /// # Returns
    /// * `HeaderSet` - Trimmed names and values. Pairs without a colon are
    ///   skipped and a repeated name keeps its last value.
    pub fn parse(raw: &str) -> Self {
        let mut headers = Self::new();
        if raw.is_empty() {
            return headers;
        }

        for pair in raw.split(',') {
            let parts: Vec<&str> = pair.trim().splitn(2, ':').collect();
            if parts.len() == 2 {
                headers.insert(parts[0].trim(), parts[1].trim());
            }
        }
        headers
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Sets `name`, first dropping every entry whose name matches it ignoring case.
    pub fn replace(&mut self, name: &str, value: impl Into<String>) {
        self.0.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.0.keys().any(|key| key.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HeaderSet {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.insert(name, value);
        }
        headers
    }
}

/// Where the request body comes from. A file always wins over inline data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Empty,
    Inline(String),
    File(PathBuf),
}

impl BodySource {
    pub fn from_flags(data: Option<String>, file: Option<PathBuf>) -> Self {
        match (file, data) {
            (Some(path), _) if !path.as_os_str().is_empty() => BodySource::File(path),
            (_, Some(data)) if !data.is_empty() => BodySource::Inline(data),
            _ => BodySource::Empty,
        }
    }

    /// Loads the effective body as raw bytes. An unreadable file is an
    /// error, never a reason to fall back to the inline value.
    pub fn resolve(self) -> Result<Bytes> {
        match self {
            BodySource::Empty => Ok(Bytes::new()),
            BodySource::Inline(data) => Ok(Bytes::from(data)),
            BodySource::File(path) => std::fs::read(&path)
                .map(Bytes::from)
                .map_err(|source| Error::FileRead { path, source }),
        }
    }
}

/// A `user:pass` pair, split on the first colon so passwords may contain colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user: String,
    pub password: String,
    raw: String,
}

impl BasicCredentials {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once(':') {
            Some((user, password)) => Ok(Self {
                user: user.to_string(),
                password: password.to_string(),
                raw: raw.to_string(),
            }),
            None => Err(Error::Config(
                "basic auth format should be 'user:pass'".to_string(),
            )),
        }
    }

    /// The string as given on the command line, which is what gets encoded.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Request deadline in whole seconds. Zero or negative means no deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout(pub i64);

impl Timeout {
    pub const DEFAULT_SECONDS: i64 = 30;

    pub fn as_duration(&self) -> Option<Duration> {
        u64::try_from(self.0)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout(Self::DEFAULT_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_pairs() {
        let headers = HeaderSet::parse(" Accept : application/json , X-Trace:abc");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Accept"), Some("application/json"));
        assert_eq!(headers.get("X-Trace"), Some("abc"));
    }

    #[test]
    fn drops_pairs_without_a_colon() {
        let headers = HeaderSet::parse("Accept:text/plain,garbage,X-One:1");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("garbage"), None);
    }

    #[test]
    fn last_repeated_key_wins() {
        let headers = HeaderSet::parse("X-Id:1,X-Id:2");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Id"), Some("2"));
    }

    #[test]
    fn splits_each_pair_on_the_first_colon_only() {
        let headers = HeaderSet::parse("Referer:http://example.com:8080/");
        assert_eq!(headers.get("Referer"), Some("http://example.com:8080/"));
    }

    #[test]
    fn empty_input_yields_no_headers() {
        assert!(HeaderSet::parse("").is_empty());
    }

    #[test]
    fn keys_are_case_sensitive_but_replace_is_not() {
        let mut headers = HeaderSet::parse("authorization:old,Accept:*/*");
        assert!(headers.contains_ignore_case("AUTHORIZATION"));
        assert_eq!(headers.get("Authorization"), None);

        headers.replace("Authorization", "Bearer new");
        assert_eq!(headers.get("authorization"), None);
        assert_eq!(headers.get("Authorization"), Some("Bearer new"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn file_body_wins_over_inline_data() {
        let source = BodySource::from_flags(Some("inline".into()), Some(PathBuf::from("b.json")));
        assert_eq!(source, BodySource::File(PathBuf::from("b.json")));

        let source = BodySource::from_flags(Some("inline".into()), None);
        assert_eq!(source, BodySource::Inline("inline".into()));

        assert_eq!(BodySource::from_flags(Some(String::new()), None), BodySource::Empty);
    }

    #[test]
    fn missing_body_file_is_fatal() {
        let source = BodySource::File(PathBuf::from("/definitely/not/here.json"));
        let err = source.resolve().unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn body_file_content_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, "{\"name\": \"zing\"}\n").unwrap();

        let body = BodySource::File(path).resolve().unwrap();
        assert_eq!(body, Bytes::from_static(b"{\"name\": \"zing\"}\n"));
    }

    #[test]
    fn binary_body_file_keeps_every_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0xff, 0x00]).unwrap();

        let body = BodySource::File(path).resolve().unwrap();
        assert_eq!(body, Bytes::from_static(&[0x89, b'P', b'N', b'G', 0xff, 0x00]));
    }

    #[test]
    fn basic_credentials_split_on_first_colon() {
        let creds = BasicCredentials::parse("alice:se:cret").unwrap();
        assert_eq!(creds.user, "alice");
        assert_eq!(creds.password, "se:cret");
        assert_eq!(creds.raw(), "alice:se:cret");
    }

    #[test]
    fn basic_credentials_without_colon_are_rejected() {
        let err = BasicCredentials::parse("alice").unwrap_err();
        assert_eq!(err.to_string(), "basic auth format should be 'user:pass'");
    }

    #[test]
    fn non_positive_timeouts_disable_the_deadline() {
        assert_eq!(Timeout::default().as_duration(), Some(Duration::from_secs(30)));
        assert_eq!(Timeout(0).as_duration(), None);
        assert_eq!(Timeout(-5).as_duration(), None);
    }
}
