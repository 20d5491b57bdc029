//! zing: a colorful command-line HTTP client
//!
//! Builds one request from flags, sends it, and renders the response in
//! normal, verbose, quiet or status-only mode.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
