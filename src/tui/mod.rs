use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

use crate::core::Session;
use crate::tui::message::Message;
use crate::tui::model::AppState;
use crate::tui::view::draw_ui;

pub mod components;
pub mod errors;
pub mod form;
mod helpers;
mod key_bindings;
mod loaders;
pub mod message;
pub mod model;
mod update;
mod view;

pub fn run_tui(session: Session) -> Result<(), String> {
    // Terminal initialization
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {e}"))?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Failed to create terminal: {e}"))?;

    let mut app = AppState::new(session);

    let result = run_app(&mut terminal, &mut app);

    // Clean up
    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {e}"))?;
    terminal
        .backend_mut()
        .execute(LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {e}"))?;
    terminal
        .show_cursor()
        .map_err(|e| format!("Failed to show cursor: {e}"))?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<(), String> {
    let (tx, rx) = crossbeam_channel::unbounded::<Message>();

    loop {
        app.run_effects(&tx);

        terminal
            .draw(|f| draw_ui(f, app))
            .map_err(|e| format!("Failed to draw: {e}"))?;

        // Results from worker threads
        for msg in rx.try_iter() {
            if !app.update(msg) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("Failed to poll events: {e}"))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("Failed to read event: {e}"))?
                && key.kind == KeyEventKind::Press
                && let Some(msg) = key_bindings::handle_key_event(key, app)
                && !app.update(msg)
            {
                return Ok(());
            }
        } else if !app.update(Message::TimerTick) {
            return Ok(());
        }
    }
}
