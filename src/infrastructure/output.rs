use crate::domain::entities::{DisplayMode, RequestConfig, Response};
use crate::domain::error::Error;
use crate::infrastructure::styles::Styles;

use anyhow::Result;
use serde_json::Value;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Renders the request and response to a terminal-like writer
pub struct Presenter<'a, W: Write> {
    styles: &'a Styles,
    out: W,
}

impl<'a, W: Write> Presenter<'a, W> {
    pub fn new(styles: &'a Styles, out: W) -> Self {
        Self { styles, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Method, URL, headers and, when verbose, the body. Nothing at all in
    /// quiet or status-only mode.
    pub fn display_request(&mut self, config: &RequestConfig) -> Result<()> {
        if config.display.mode() != DisplayMode::Normal {
            return Ok(());
        }
        let st = self.styles;
        let verbose = config.display.verbose;

        writeln!(self.out)?;
        writeln!(self.out, "{}", st.header.paint("REQUEST"))?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} {}",
            st.method.paint(&config.method),
            st.url.paint(&config.url)
        )?;
        writeln!(self.out)?;

        if !config.headers.is_empty() {
            writeln!(self.out, "{}", st.key.paint("Headers:"))?;
            for (name, value) in config.headers.iter() {
                let shown = mask_authorization(name, value, verbose);
                writeln!(self.out, "  {}: {}", st.key.paint(name), st.value.paint(&shown))?;
            }
            writeln!(self.out)?;
        }

        if verbose && config.has_body() {
            writeln!(self.out, "{}", st.key.paint("Body:"))?;
            let body = String::from_utf8_lossy(&config.body);
            writeln!(self.out, "{}", st.body.paint(&format_json(&body)))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Saves the body if asked to, then renders according to the display mode.
    pub fn display_response(&mut self, config: &RequestConfig, response: &Response) -> Result<()> {
        if let Some(path) = &config.output_file {
            save_body(path, response)?;
            if !config.display.quiet {
                writeln!(
                    self.out,
                    "{} {}",
                    self.styles.success.paint("Response saved to:"),
                    path.display()
                )?;
            }
        }

        match config.display.mode() {
            DisplayMode::StatusOnly => self.display_status_only(response),
            DisplayMode::Quiet => self.display_body_only(response),
            DisplayMode::Normal => self.display_full(response, config.display.verbose),
        }
    }

    fn display_status_only(&mut self, response: &Response) -> Result<()> {
        let status = response.status.to_string();
        writeln!(self.out, "{}", self.styles.status(response.status).paint(&status))?;
        Ok(())
    }

    fn display_body_only(&mut self, response: &Response) -> Result<()> {
        if !response.body.is_empty() {
            writeln!(self.out, "{}", format_json(&response.body_text()))?;
        }
        Ok(())
    }

    fn display_full(&mut self, response: &Response, verbose: bool) -> Result<()> {
        let st = self.styles;
        let status_style = st.status(response.status);

        writeln!(self.out, "{}", st.header.paint("RESPONSE"))?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} {}",
            status_style.paint("Status:"),
            status_style.paint(&response.status_line())
        )?;
        writeln!(
            self.out,
            "{} {}",
            st.key.paint("Time:"),
            st.value.paint(&format_duration(response.elapsed))
        )?;
        if verbose {
            writeln!(
                self.out,
                "{} {}",
                st.key.paint("Size:"),
                st.value.paint(&format!("{} bytes", response.size()))
            )?;
        }
        writeln!(self.out)?;

        if verbose && !response.headers.is_empty() {
            writeln!(self.out, "{}", st.key.paint("Headers:"))?;
            for (name, values) in &response.headers {
                writeln!(
                    self.out,
                    "  {}: {}",
                    st.key.paint(name),
                    st.value.paint(&values.join(", "))
                )?;
            }
            writeln!(self.out)?;
        }

        if !response.body.is_empty() {
            writeln!(self.out, "{}", st.key.paint("Body:"))?;
            writeln!(self.out, "{}", st.body.paint(&format_json(&response.body_text())))?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Writes the raw body bytes, untouched.
fn save_body(path: &Path, response: &Response) -> Result<(), Error> {
    std::fs::write(path, &response.body).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = response.size(), "saved response body");
    Ok(())
}

/// Hides credentials in an `Authorization` value, keeping only the scheme.
/// Verbose output shows the real value.
pub fn mask_authorization<'v>(name: &str, value: &'v str, verbose: bool) -> Cow<'v, str> {
    if verbose || !name.eq_ignore_ascii_case("authorization") {
        return Cow::Borrowed(value);
    }
    if value.starts_with("Bearer ") {
        Cow::Borrowed("Bearer ***")
    } else if value.starts_with("Basic ") {
        Cow::Borrowed("Basic ***")
    } else {
        Cow::Borrowed(value)
    }
}

/// Re-indents JSON with two spaces; anything unparseable comes back unchanged.
pub fn format_json(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body.to_string())
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
