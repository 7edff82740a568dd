//! View builders. Each function turns state into ratatui text without
//! touching a terminal.

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::time::Instant;

use crate::remote::{DisableReason, DisabledNotice};
use crate::tui::errors::ErrorList;
use crate::tui::form::FormState;

pub const APP_TITLE: &str = "Options Background Generator";

pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// The screen shown instead of the application when it is disabled
pub fn disabled_notice(notice: &DisabledNotice) -> Text<'static> {
    let headline = match notice.reason {
        DisableReason::Remote => {
            format!("The {APP_TITLE} has been disabled remotely. Check back later?")
        }
        DisableReason::Manual => format!("The {APP_TITLE} has been disabled."),
        DisableReason::Unreachable => format!(
            "The {APP_TITLE} has been disabled because its remote control could not be reached."
        ),
    };

    let mut lines = vec![Line::from(headline)];

    if let Some(message) = &notice.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(updated_at) = &notice.updated_at {
        let by = notice
            .updated_by
            .as_deref()
            .map(|author| format!(" by {author}"))
            .unwrap_or_default();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Last updated {}{by}", format_timestamp(updated_at)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    Text::from(lines)
}

/// Rows of the texture selector. While the disabled placeholder is due, it
/// is the only row.
pub fn selector_rows(form: &FormState, now: Instant) -> Vec<Line<'static>> {
    if let Some(placeholder) = form.visible_placeholder(now) {
        return vec![Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))];
    }

    form.options()
        .iter()
        .map(|option| Line::from(option.label.clone()))
        .collect()
}

/// One line per reported error, oldest first
pub fn error_rows(errors: &ErrorList) -> Vec<Line<'static>> {
    errors
        .iter()
        .map(|report| {
            let mut spans = vec![Span::styled("✗ ", Style::default().fg(Color::Red))];
            if let Some(category) = report.category {
                spans.push(Span::styled(
                    format!("[{category}] "),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::raw(report.message.clone()));
            Line::from(spans)
        })
        .collect()
}

/// Rows `lines` occupy once wrapped to `width` columns. Word wrapping can
/// push a long word onto its own row, so each line gets one row of slack
/// when it wraps at all.
#[must_use]
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| match line.width() {
            0 => 1,
            w if w <= width => 1,
            w => w.div_ceil(width) + 1,
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Key hints for the footer, depending on what is currently possible
pub fn key_hints(can_retry: bool, has_errors: bool, disabled: bool) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Blue));
    let mut spans = vec![Span::raw(" ")];

    if !disabled {
        spans.extend([
            key("↕"),
            Span::raw(" to select | "),
            key("Enter"),
            Span::raw(" to build | "),
        ]);
        if can_retry {
            spans.extend([key("r"), Span::raw(" to retry | ")]);
        }
        if has_errors {
            spans.extend([key("x"), Span::raw(" to dismiss | ")]);
        }
    }
    spans.extend([Span::raw("("), key("Q"), Span::raw(")uit ───")]);
    Line::from(spans).right_aligned()
}
