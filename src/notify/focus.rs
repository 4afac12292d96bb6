/// The part of a document a modal needs in order to manage focus
pub trait FocusHost {
    /// Ids of focusable elements inside the modal, in tab order
    fn focusable(&self) -> Vec<String>;

    /// Id of the element that currently has focus
    fn focused(&self) -> Option<String>;

    /// Move focus; returns false if the element no longer exists
    fn focus(&self, id: &str) -> bool;
}

/// Keys the trap reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKey {
    Tab,
    ShiftTab,
    Escape,
    Other,
}

/// What the modal should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Focus moved inside the modal; suppress the default action
    Handled,
    /// The modal should close
    Close,
    /// Let the key through
    Ignored,
}

/// Keeps keyboard focus inside a modal dialog
///
/// Every operation degrades silently: a missing element just leaves focus
/// where it is.
#[derive(Debug, Default)]
pub struct FocusTrap {
    previous: Option<String>,
    active: bool,
}

impl FocusTrap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Remember the focused element and move focus to the first focusable one
    pub fn activate<H: FocusHost + ?Sized>(&mut self, host: &H) {
        self.previous = host.focused();
        self.active = true;
        if let Some(first) = host.focusable().first() {
            host.focus(first);
        }
    }

    pub fn handle_key<H: FocusHost + ?Sized>(&mut self, host: &H, key: TrapKey) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }
        match key {
            TrapKey::Escape => KeyOutcome::Close,
            TrapKey::Tab | TrapKey::ShiftTab => {
                let ids = host.focusable();
                if ids.is_empty() {
                    return KeyOutcome::Handled;
                }
                let current = host
                    .focused()
                    .and_then(|focused| ids.iter().position(|id| *id == focused));
                let next = match (key, current) {
                    (TrapKey::ShiftTab, Some(0) | None) => ids.len() - 1,
                    (TrapKey::ShiftTab, Some(i)) => i - 1,
                    (_, Some(i)) if i + 1 < ids.len() => i + 1,
                    _ => 0,
                };
                host.focus(&ids[next]);
                KeyOutcome::Handled
            },
            TrapKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Deactivate and give focus back to whatever had it before
    pub fn release<H: FocusHost + ?Sized>(&mut self, host: &H) {
        self.active = false;
        if let Some(previous) = self.previous.take() {
            if !host.focus(&previous) {
                tracing::debug!("Previously focused element {} is gone", previous);
            }
        }
    }
}
