use clap::{CommandFactory, Parser};
use zing::application::services::HttpRequestService;
use zing::domain::error::Error;
use zing::infrastructure::http_client::HyperHttpClient;
use zing::infrastructure::logging;
use zing::infrastructure::styles::Styles;
use zing::presentation::cli::Cli;

/// zing: send one HTTP request, see the answer in color
///
/// Builds the request from flags (method, URL, headers, bearer or basic auth,
/// inline or file body), sends it with a timeout and optional redirect
/// following, and prints the response in normal, verbose, quiet or
/// status-only form, optionally saving the body to a file.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let styles = Styles::new();

    if let Err(err) = run(&cli, &styles).await {
        eprintln!("Error: {}", err);
        if err.downcast_ref::<Error>().is_some_and(Error::is_missing_url) {
            eprintln!();
            eprintln!("{}", Cli::command().render_help());
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, styles: &Styles) -> anyhow::Result<()> {
    let http_client = HyperHttpClient::new()?;
    let request_service = HttpRequestService::new(Box::new(http_client));
    cli.run(&request_service, styles).await
}
