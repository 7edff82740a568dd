use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::scrollbar;
use ratatui::text::Line;
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

fn panel(title: &str, is_active: bool) -> Block<'_> {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Plain);
    if is_active {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block.border_style(Style::default().fg(Color::DarkGray))
    }
}

// Render a selectable list with an integrated scroll bar
pub fn render_list_with_scrollbar(
    f: &mut ratatui::Frame,
    area: Rect,
    rows: Vec<Line<'static>>,
    selected: Option<usize>,
    title: &str,
    is_active: bool,
) {
    let total_rows = rows.len();
    let visible_height = (area.height as usize).saturating_sub(2); // Account for borders

    let list = List::new(rows.into_iter().map(ListItem::new))
        .block(panel(title, is_active))
        .highlight_style(if is_active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        })
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut list_state);

    if total_rows > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(scrollbar::VERTICAL)
            .begin_symbol(None)
            .track_symbol(None)
            .end_symbol(None)
            .style(Style::default().fg(if is_active { Color::Yellow } else { Color::Gray }));

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_rows.saturating_sub(visible_height))
            .viewport_content_length(visible_height)
            .position(list_state.offset());

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

// Render plain lines inside a bordered panel
pub fn render_lines(f: &mut ratatui::Frame, area: Rect, rows: Vec<Line<'static>>, title: &str) {
    let paragraph = ratatui::widgets::Paragraph::new(rows)
        .block(panel(title, false).border_style(Style::default().fg(Color::Red)))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(paragraph, area);
}
