use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::message::{FormNavigation, Message};
use crate::tui::model::{AppState, AppView};

/// Handle key events and convert them to appropriate messages
pub fn handle_key_event(key: KeyEvent, app: &AppState) -> Option<Message> {
    match &app.view {
        AppView::Disabled { .. } => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            _ => None,
        },
        AppView::Main => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::Form(FormNavigation::SelectNext)),
            KeyCode::Char('k') | KeyCode::Up => {
                Some(Message::Form(FormNavigation::SelectPrevious))
            }
            KeyCode::Char('g') | KeyCode::Home => {
                Some(Message::Form(FormNavigation::SelectFirst))
            }
            KeyCode::Char('G') | KeyCode::End => Some(Message::Form(FormNavigation::SelectLast)),
            KeyCode::Enter => Some(Message::Submit),
            KeyCode::Char('r') if app.retry_available => Some(Message::RetryCatalog),
            KeyCode::Char('x') if app.errors.is_visible() => Some(Message::DismissError),
            _ => None,
        },
    }
}
