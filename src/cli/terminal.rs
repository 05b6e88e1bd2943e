//! Colour and width detection for terminal output

use owo_colors::{OwoColorize, Style, colors::css};

fn colour_enabled() -> bool {
    supports_color::on_cached(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is narrower than 60 columns.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

fn paint(text: &str, style: Style) -> String {
    if colour_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Colours text when stdout supports it.
pub trait Colorize: AsRef<str> {
    /// Green.
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Green>())
    }

    /// Orange.
    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Orange>().bold())
    }

    /// Light blue.
    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::LightBlue>())
    }

    /// Dimmed.
    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}
