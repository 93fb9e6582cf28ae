//! Input handling for the TUI.
//!
//! This module translates terminal events into application actions. Focus changes
//! are the screen's visibility lifecycle.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions that can be performed based on user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Quit the application
    Quit,
    /// Screen became visible
    Shown,
    /// Screen was hidden
    Hidden,
    /// Fire a haptic pulse
    Vibrate,
    /// Open the connectivity dialog
    CheckConnectivity,
    /// Close the connectivity dialog
    DismissDialog,
    /// Open the map at the reported location
    OpenMap,
    /// Toggle help panel
    ToggleHelp,
    /// No action
    None,
}

/// Map a terminal event to an application action
pub fn map_event(event: &Event, dialog_open: bool) -> InputAction {
    match event {
        Event::FocusGained => InputAction::Shown,
        Event::FocusLost => InputAction::Hidden,
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            map_key_to_action(*key_event, dialog_open)
        }
        _ => InputAction::None,
    }
}

/// Map a key event to an application action
fn map_key_to_action(key_event: KeyEvent, dialog_open: bool) -> InputAction {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL)
    {
        return InputAction::Quit;
    }

    if dialog_open {
        return match key_event.code {
            KeyCode::Enter | KeyCode::Esc => InputAction::DismissDialog,
            KeyCode::Char('o') | KeyCode::Char('O') => InputAction::DismissDialog,
            KeyCode::Char('m') | KeyCode::Char('M') => InputAction::OpenMap,
            KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
            _ => InputAction::None,
        };
    }

    match key_event.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        KeyCode::Esc => InputAction::Quit,

        // Buttons
        KeyCode::Char('v') | KeyCode::Char('V') => InputAction::Vibrate,
        KeyCode::Char('c') | KeyCode::Char('C') => InputAction::CheckConnectivity,

        // Help
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            InputAction::ToggleHelp
        }

        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_quit_actions() {
        assert_eq!(map_event(&key(KeyCode::Char('q')), false), InputAction::Quit);
        assert_eq!(map_event(&key(KeyCode::Esc), false), InputAction::Quit);
        assert_eq!(
            map_event(
                &Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
                true
            ),
            InputAction::Quit
        );
    }

    #[test]
    fn test_buttons() {
        assert_eq!(map_event(&key(KeyCode::Char('v')), false), InputAction::Vibrate);
        assert_eq!(
            map_event(&key(KeyCode::Char('c')), false),
            InputAction::CheckConnectivity
        );
    }

    #[test]
    fn test_dialog_keys() {
        assert_eq!(map_event(&key(KeyCode::Esc), true), InputAction::DismissDialog);
        assert_eq!(map_event(&key(KeyCode::Enter), true), InputAction::DismissDialog);
        assert_eq!(map_event(&key(KeyCode::Char('m')), true), InputAction::OpenMap);
        assert_eq!(map_event(&key(KeyCode::Char('v')), true), InputAction::None);
        assert_eq!(map_event(&key(KeyCode::Char('m')), false), InputAction::None);
    }

    #[test]
    fn test_focus_is_visibility() {
        assert_eq!(map_event(&Event::FocusGained, false), InputAction::Shown);
        assert_eq!(map_event(&Event::FocusLost, true), InputAction::Hidden);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::empty());
        release.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(release), false), InputAction::None);
    }
}
