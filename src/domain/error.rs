use std::path::PathBuf;

/// Everything that can stop a request from being built, sent or rendered.
///
/// None of these are retried. The binary reports the message once and exits
/// with a non-zero code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("error reading file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error saving file {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error creating request: {0}")]
    RequestBuild(String),

    #[error("error making request: {0}")]
    Network(String),

    #[error("error reading response body: {0}")]
    BodyRead(String),
}

impl Error {
    pub fn url_required() -> Self {
        Error::Config("URL is required".to_string())
    }

    /// True for the missing-URL case, which the CLI answers with usage text.
    pub fn is_missing_url(&self) -> bool {
        matches!(self, Error::Config(msg) if msg == "URL is required")
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
