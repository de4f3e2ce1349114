//! Key bindings
//!
//! Maps crossterm key events to the finite set of [`Action`]s the app
//! understands. What an action does depends on the focused pane.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Operator intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the cursor of the focused list down
    Down,
    /// Move the cursor of the focused list up
    Up,
    /// Focus the next list pane
    NextPane,
    /// Focus the previous list pane
    PrevPane,
    /// Activate the item under the cursor
    Toggle,
    /// Copy the config to the clipboard (file fallback)
    Save,
    /// Enumerate again now
    Refresh,
    /// Leave the app
    Quit,
}

/// Key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Plain key without modifiers
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Ctrl+key
    #[must_use]
    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }
}

/// Key binding table
#[derive(Debug, Clone)]
pub struct KeyBinding {
    bindings: HashMap<KeyCombo, Action>,
}

impl Default for KeyBinding {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Navigation
        bindings.insert(KeyCombo::key(KeyCode::Down), Action::Down);
        bindings.insert(KeyCombo::key(KeyCode::Char('j')), Action::Down);
        bindings.insert(KeyCombo::key(KeyCode::Up), Action::Up);
        bindings.insert(KeyCombo::key(KeyCode::Char('k')), Action::Up);
        bindings.insert(KeyCombo::key(KeyCode::Tab), Action::NextPane);
        bindings.insert(KeyCombo::key(KeyCode::Right), Action::NextPane);
        bindings.insert(KeyCombo::key(KeyCode::BackTab), Action::PrevPane);
        bindings.insert(
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Action::PrevPane,
        );
        bindings.insert(KeyCombo::key(KeyCode::Left), Action::PrevPane);

        // Actions
        bindings.insert(KeyCombo::key(KeyCode::Enter), Action::Toggle);
        bindings.insert(KeyCombo::key(KeyCode::Char(' ')), Action::Toggle);
        bindings.insert(KeyCombo::key(KeyCode::Char('s')), Action::Save);
        bindings.insert(KeyCombo::key(KeyCode::Char('r')), Action::Refresh);

        // Quit
        bindings.insert(KeyCombo::key(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('c')), Action::Quit);

        Self { bindings }
    }
}

impl KeyBinding {
    /// Look up the action for a key event
    ///
    /// Release and repeat events are ignored.
    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        self.bindings
            .get(&KeyCombo::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind `combo` to `action`, replacing any previous binding
    pub fn bind(&mut self, combo: KeyCombo, action: Action) {
        self.bindings.insert(combo, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_default_navigation() {
        let binding = KeyBinding::default();
        assert_eq!(
            binding.action(&press(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::Down)
        );
        assert_eq!(
            binding.action(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(Action::Up)
        );
        assert_eq!(
            binding.action(&press(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::NextPane)
        );
        assert_eq!(
            binding.action(&press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::PrevPane)
        );
    }

    #[test]
    fn test_quit_bindings() {
        let binding = KeyBinding::default();
        assert_eq!(
            binding.action(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(
            binding.action(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            binding.action(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let binding = KeyBinding::default();
        let mut key = press(KeyCode::Char('s'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(binding.action(&key), None);
    }

    #[test]
    fn test_custom_binding() {
        let mut binding = KeyBinding::default();
        binding.bind(KeyCombo::key(KeyCode::Char('x')), Action::Save);
        assert_eq!(
            binding.action(&press(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Action::Save)
        );
    }
}
