use std::time::{Duration, Instant};

use crate::remote::SelectOption;

/// The texture selector and its submit control
#[derive(Debug, Default)]
pub struct FormState {
    options: Vec<SelectOption>,
    selected: Option<usize>,
    disabled: Option<DisabledState>,
    next_ticket: u64,
}

#[derive(Debug)]
struct DisabledState {
    ticket: u64,
    placeholder: String,
    since: Instant,
    delay: Duration,
    /// Value to restore on release
    prior: Option<String>,
}

/// Returned by [`FormState::disable`]; the only way to re-enable the form.
///
/// Disabling again while a handle is outstanding supersedes it, and releasing
/// a superseded handle does nothing.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the form stays disabled until the handle is released"]
pub struct DisableHandle {
    ticket: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the selector and submit control inactive. The placeholder only
    /// becomes visible once `delay` has elapsed.
    pub fn disable(&mut self, placeholder: impl Into<String>, delay: Duration) -> DisableHandle {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        // Nested disables keep the selection captured by the first one
        let prior = match self.disabled.take() {
            Some(previous) => previous.prior,
            None => self.selected_value().map(str::to_string),
        };

        self.disabled = Some(DisabledState {
            ticket,
            placeholder: placeholder.into(),
            since: Instant::now(),
            delay,
            prior,
        });
        DisableHandle { ticket }
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }

    /// Placeholder text, once the disabled state is due to be shown
    #[must_use]
    pub fn visible_placeholder(&self, now: Instant) -> Option<&str> {
        self.disabled
            .as_ref()
            .filter(|state| now.saturating_duration_since(state.since) >= state.delay)
            .map(|state| state.placeholder.as_str())
    }

    /// Replace the options. While disabled, `default` becomes the selection
    /// restored on release.
    pub fn set_options(&mut self, options: Vec<SelectOption>, default: Option<usize>) {
        let default = default.filter(|&idx| idx < options.len());
        let default_value = default.map(|idx| options[idx].value.clone());
        self.options = options;

        match &mut self.disabled {
            Some(state) => {
                state.prior = default_value;
                self.selected = None;
            }
            None => self.selected = default,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|option| option.value.as_str())
    }

    pub fn select_next(&mut self) {
        if self.is_disabled() || self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1).min(self.options.len() - 1),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.is_disabled() || self.options.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |idx| idx.saturating_sub(1)));
    }

    pub fn select_first(&mut self) {
        if !self.is_disabled() && !self.options.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.is_disabled() && !self.options.is_empty() {
            self.selected = Some(self.options.len() - 1);
        }
    }

    /// Value to submit, or `None` while disabled or with nothing selected
    #[must_use]
    pub fn submit(&self) -> Option<String> {
        if self.is_disabled() {
            return None;
        }
        self.selected_value().map(str::to_string)
    }

    fn restore(&mut self, prior: Option<String>) {
        self.selected = prior.and_then(|value| {
            self.options
                .iter()
                .position(|option| option.value == value)
        });
    }
}

impl DisableHandle {
    /// Change the placeholder, whether or not it is visible yet
    pub fn update_text(&self, form: &mut FormState, text: impl Into<String>) {
        if let Some(state) = form.disabled.as_mut()
            && state.ticket == self.ticket
        {
            state.placeholder = text.into();
        }
    }

    /// Re-enable the controls, drop the placeholder and restore the selection
    pub fn release(self, form: &mut FormState) {
        let is_current = form
            .disabled
            .as_ref()
            .is_some_and(|state| state.ticket == self.ticket);
        if !is_current {
            return;
        }
        if let Some(state) = form.disabled.take() {
            form.restore(state.prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<SelectOption> {
        values
            .iter()
            .map(|value| SelectOption {
                label: value.trim_end_matches(".png").to_string(),
                value: (*value).to_string(),
            })
            .collect()
    }

    fn form_with(values: &[&str], selected: Option<usize>) -> FormState {
        let mut form = FormState::new();
        form.set_options(options(values), selected);
        form
    }

    #[test]
    fn test_disable_blocks_input() {
        let mut form = form_with(&["dirt.png", "stone.png"], Some(1));
        let handle = form.disable("Building pack…", Duration::ZERO);

        assert!(form.is_disabled());
        assert_eq!(form.submit(), None);
        form.select_first();
        assert_eq!(form.selected_index(), Some(1));

        handle.release(&mut form);
        assert!(!form.is_disabled());
        assert_eq!(form.submit().as_deref(), Some("stone.png"));
    }

    #[test]
    fn test_placeholder_waits_for_delay() {
        let mut form = form_with(&["stone.png"], Some(0));
        let handle = form.disable("Loading…", Duration::from_secs(60));
        let now = Instant::now();
        assert_eq!(form.visible_placeholder(now), None);
        assert_eq!(
            form.visible_placeholder(now + Duration::from_secs(61)),
            Some("Loading…")
        );
        handle.release(&mut form);
        assert_eq!(
            form.visible_placeholder(now + Duration::from_secs(61)),
            None
        );
    }

    #[test]
    fn test_update_text_before_and_after_visible() {
        let mut form = FormState::new();
        let handle = form.disable("Checking…", Duration::ZERO);
        handle.update_text(&mut form, "Still checking…");
        assert_eq!(
            form.visible_placeholder(Instant::now()),
            Some("Still checking…")
        );
        handle.update_text(&mut form, "Almost there…");
        assert_eq!(form.visible_placeholder(Instant::now()), Some("Almost there…"));
        handle.release(&mut form);
    }

    #[test]
    fn test_options_loaded_while_disabled_restore_default() {
        let mut form = FormState::new();
        let handle = form.disable("Loading textures…", Duration::ZERO);
        form.set_options(options(&["dirt.png", "stone.png"]), Some(1));
        assert_eq!(form.selected_index(), None);

        handle.release(&mut form);
        assert_eq!(form.selected_value(), Some("stone.png"));
    }

    #[test]
    fn test_superseded_handle_is_ignored() {
        let mut form = form_with(&["dirt.png", "stone.png"], Some(0));
        let first = form.disable("one", Duration::ZERO);
        let second = form.disable("two", Duration::ZERO);

        first.release(&mut form);
        assert!(form.is_disabled());

        second.release(&mut form);
        assert!(!form.is_disabled());
        assert_eq!(form.selected_value(), Some("dirt.png"));
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut form = form_with(&["a.png", "b.png", "c.png"], None);
        form.select_previous();
        assert_eq!(form.selected_index(), Some(0));
        form.select_last();
        form.select_next();
        assert_eq!(form.selected_index(), Some(2));
        form.select_previous();
        assert_eq!(form.selected_index(), Some(1));
    }

    #[test]
    fn test_out_of_range_default_is_ignored() {
        let form = form_with(&["a.png"], Some(4));
        assert_eq!(form.selected_index(), None);
    }
}
