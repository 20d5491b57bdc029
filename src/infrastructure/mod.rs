pub mod http_client;
pub mod logging;
pub mod output;
pub mod redirects;
pub mod styles;
