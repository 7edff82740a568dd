use std::time::Duration;

use crate::core::Session;
use crate::remote::DisabledNotice;
use crate::tui::errors::ErrorList;
use crate::tui::form::{DisableHandle, FormState};
use crate::tui::message::Command;

pub enum AppView {
    /// Texture selector and error panel
    Main,
    /// Everything replaced by the notice; nothing else runs
    Disabled { notice: DisabledNotice },
}

// Define the application state (Model)
pub struct AppState {
    pub session: Session,
    pub view: AppView,
    pub form: FormState,
    pub errors: ErrorList,
    /// Held while an operation is in flight
    pub busy: Option<DisableHandle>,
    /// Set after a failed catalog load
    pub retry_available: bool,
    /// Last success message shown in the status line
    pub status: Option<String>,
    // Effects produced by update to be executed by the runner
    pub effects: Vec<Command>,
    pub disable_delay: Duration,
}

impl AppState {
    /// Create the state for a fresh launch. The remote control check is the
    /// first effect queued.
    pub fn new(session: Session) -> Self {
        let disable_delay = session.config().tui.disable_delay();
        let mut app = Self {
            session,
            view: AppView::Main,
            form: FormState::new(),
            errors: ErrorList::new(),
            busy: None,
            retry_available: false,
            status: None,
            effects: Vec::new(),
            disable_delay,
        };
        app.start(Command::CheckRemoteControl, "Checking availability…");
        app
    }

    /// Disable the form and queue `command`
    pub fn start(&mut self, command: Command, placeholder: &str) {
        let handle = self.form.disable(placeholder, self.disable_delay);
        if let Some(previous) = self.busy.replace(handle) {
            previous.release(&mut self.form);
        }
        self.effects.push(command);
    }

    /// Queue `command` as part of the operation already in flight, only
    /// changing the placeholder text
    pub fn continue_with(&mut self, command: Command, placeholder: &str) {
        match &self.busy {
            Some(handle) => {
                handle.update_text(&mut self.form, placeholder);
                self.effects.push(command);
            }
            None => self.start(command, placeholder),
        }
    }

    /// Re-enable the form after the in-flight operation finished
    pub fn finish(&mut self) {
        if let Some(handle) = self.busy.take() {
            handle.release(&mut self.form);
        }
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy.is_some()
    }
}
