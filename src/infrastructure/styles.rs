use colored::{Color, ColoredString, Colorize};

/// A foreground color with optional bold weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
}

impl Style {
    const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: Color::TrueColor { r, g, b },
            bold: false,
        }
    }

    const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let painted = text.color(self.color);
        if self.bold { painted.bold() } else { painted }
    }
}

/// Three-way status classification. 1xx, 4xx and 5xx all count as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Warning,
    Error,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Warning,
            _ => StatusClass::Error,
        }
    }
}

/// The terminal palette. Built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Styles {
    pub header: Style,
    pub method: Style,
    pub url: Style,
    pub key: Style,
    pub value: Style,
    pub body: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

impl Styles {
    pub fn new() -> Self {
        Self {
            header: Style::new(255, 95, 175).bold(),
            method: Style::new(95, 255, 215).bold(),
            url: Style::new(0, 135, 255),
            key: Style::new(255, 175, 0),
            value: Style::new(208, 208, 208),
            body: Style::new(208, 208, 208),
            success: Style::new(0, 255, 0),
            warning: Style::new(255, 255, 0),
            error: Style::new(255, 0, 0),
        }
    }

    /// Bold status color for a response code
    pub fn status(&self, status: u16) -> Style {
        let style = match StatusClass::of(status) {
            StatusClass::Success => self.success,
            StatusClass::Warning => self.warning,
            StatusClass::Error => self.error,
        };
        style.bold()
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}
