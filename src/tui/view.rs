use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::time::Instant;

use crate::tui::components;
use crate::tui::helpers::{render_lines, render_list_with_scrollbar};
use crate::tui::model::{AppState, AppView};

// The main view function - renders the UI based on the current state
pub fn draw_ui(f: &mut ratatui::Frame, app: &AppState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    // Header
    let title = Block::default()
        .title("───")
        .title(Line::from(format!(" {} ", components::APP_TITLE)).left_aligned())
        .borders(Borders::TOP)
        .border_type(ratatui::widgets::BorderType::Plain);
    f.render_widget(title, chunks[0]);

    let disabled = match &app.view {
        AppView::Main => {
            render_main(f, app, chunks[1]);
            false
        }
        AppView::Disabled { notice } => {
            let paragraph = Paragraph::new(components::disabled_notice(notice))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, chunks[1]);
            true
        }
    };

    let hints = Block::default()
        .title(components::key_hints(
            app.retry_available,
            app.errors.is_visible(),
            disabled,
        ))
        .borders(Borders::TOP);
    f.render_widget(hints, chunks[2]);
}

fn render_main(f: &mut ratatui::Frame, app: &AppState, area: ratatui::layout::Rect) {
    let error_rows = components::error_rows(&app.errors);

    let mut constraints = vec![Constraint::Min(3)];
    if app.errors.is_visible() {
        // Borders take two columns and two rows
        let height = components::wrapped_height(&error_rows, area.width.saturating_sub(2));
        let max_height = area.height.saturating_sub(4);
        constraints.push(Constraint::Length(height.saturating_add(2).min(max_height)));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let rows = components::selector_rows(&app.form, Instant::now());
    // The placeholder row is not an option, so nothing is highlighted under it
    let selected = if app.form.visible_placeholder(Instant::now()).is_some() {
        None
    } else {
        app.form.selected_index()
    };
    render_list_with_scrollbar(
        f,
        chunks[0],
        rows,
        selected,
        " Texture ",
        !app.form.is_disabled(),
    );

    if app.errors.is_visible() {
        render_lines(f, chunks[1], error_rows, " Errors ");
    }

    let status = app.status.as_deref().unwrap_or("");
    f.render_widget(Paragraph::new(format!(" {status}")), chunks[chunks.len() - 1]);
}
