use crate::application::builders::request_builder::RequestConfigBuilder;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{DisplayOptions, RequestConfig};
use crate::domain::error::Result as DomainResult;
use crate::domain::value_objects::{BodySource, Timeout};
use crate::infrastructure::output::Presenter;
use crate::infrastructure::styles::Styles;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  zing -m GET -u https://api.github.com/users/octocat
  zing -m POST -u https://api.example.com/users -f body.json
  zing -u https://api.example.com/data -b token123
  zing -u https://api.example.com/data -a 'user:pass'
  zing -u https://api.example.com/data -o response.json";

/// CLI configuration for zing
#[derive(Parser, Debug)]
#[command(name = "zing", version)]
#[command(about = "zing: a colorful command-line HTTP client", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH, ...)
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// URL to request
    #[arg(short, long)]
    pub url: Option<String>,

    /// Request body (JSON string)
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Read request body from file (overrides --data)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Headers (format: 'Key:Value,Key2:Value2')
    #[arg(short = 'H', long = "header")]
    pub header: Option<String>,

    /// Bearer token (sets Authorization header)
    #[arg(short, long)]
    pub bearer: Option<String>,

    /// Basic auth (format: 'user:pass')
    #[arg(short, long)]
    pub auth: Option<String>,

    /// Save response body to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds (0 or less disables it)
    #[arg(short, long, default_value_t = Timeout::DEFAULT_SECONDS, allow_negative_numbers = true)]
    pub timeout: i64,

    /// Follow redirects
    #[arg(short = 'L', long)]
    pub follow: bool,

    /// Quiet mode (only show response body)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (show more details, unmask credentials)
    #[arg(short, long)]
    pub verbose: bool,

    /// Show only status code
    #[arg(short, long = "status-only")]
    pub status_only: bool,
}

impl Cli {
    pub fn to_config(&self) -> DomainResult<RequestConfig> {
        RequestConfigBuilder::new()
            .method(&self.method)
            .url(self.url.as_deref())
            .headers(self.header.as_deref())
            .body(BodySource::from_flags(self.data.clone(), self.file.clone()))
            .timeout(self.timeout)
            .follow_redirects(self.follow)
            .bearer_token(self.bearer.as_deref())
            .basic_auth(self.auth.as_deref())
            .output_file(self.output.clone())
            .display(DisplayOptions {
                quiet: self.quiet,
                verbose: self.verbose,
                status_only: self.status_only,
            })
            .build()
    }

    pub async fn run(&self, request_service: &HttpRequestService, styles: &Styles) -> Result<()> {
        self.run_with(request_service, styles, std::io::stdout()).await
    }

    /// Resolve, authenticate, show the request, send it, show the response.
    pub async fn run_with<W: Write>(
        &self,
        request_service: &HttpRequestService,
        styles: &Styles,
        out: W,
    ) -> Result<()> {
        let mut config = self.to_config()?;
        request_service.authorize(&mut config)?;

        let mut presenter = Presenter::new(styles, out);
        presenter.display_request(&config)?;

        let response = request_service.send_request(&config).await?;
        presenter.display_response(&config, &response)?;
        Ok(())
    }
}
