//! CLI output that reuses the TUI view builders so both front ends say the
//! same thing.
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use std::fmt::Write;

use crate::remote::{Catalog, DisabledNotice};

pub struct CliFormatter;

impl CliFormatter {
    /// The disabled notice as colored terminal text
    #[must_use]
    pub fn format_notice(notice: &DisabledNotice) -> String {
        Self::text_to_ansi_string(&crate::tui::components::disabled_notice(notice))
    }

    /// One line per option: label, file name, and a marker on the default
    #[must_use]
    pub fn format_catalog(catalog: &Catalog) -> String {
        let default = catalog.default_selection();
        let width = catalog
            .options()
            .iter()
            .map(|option| option.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        let _ = writeln!(
            output,
            "\x1b[1m{} textures at {}\x1b[0m",
            catalog.len(),
            catalog.git_ref()
        );
        for (i, option) in catalog.options().iter().enumerate() {
            let marker = if Some(i) == default { " (default)" } else { "" };
            let _ = writeln!(
                output,
                "  {:<width$}  {}{marker}",
                option.label, option.value
            );
        }
        output
    }

    /// Convert ratatui Text to a string with ANSI escape codes
    #[must_use]
    pub fn text_to_ansi_string(text: &Text) -> String {
        let mut result = String::new();

        for line in &text.lines {
            for span in &line.spans {
                let ansi_start = Self::style_to_ansi_start(&span.style);
                let ansi_end = if span.style == Style::default() {
                    ""
                } else {
                    "\x1b[0m"
                };
                let _ = write!(result, "{ansi_start}{}{ansi_end}", span.content);
            }
            result.push('\n');
        }

        if result.ends_with('\n') {
            result.pop();
        }

        result
    }

    fn style_to_ansi_start(style: &Style) -> String {
        let mut ansi = String::new();

        if let Some(code) = style.fg.and_then(Self::color_code) {
            let _ = write!(ansi, "\x1b[{code}m");
        }
        if style.add_modifier.contains(Modifier::BOLD) {
            ansi.push_str("\x1b[1m");
        }
        if style.add_modifier.contains(Modifier::ITALIC) {
            ansi.push_str("\x1b[3m");
        }

        ansi
    }

    const fn color_code(color: Color) -> Option<u8> {
        match color {
            Color::Red => Some(31),
            Color::Yellow => Some(33),
            Color::Blue => Some(34),
            Color::Gray => Some(37),
            Color::DarkGray => Some(90),
            _ => None,
        }
    }
}
