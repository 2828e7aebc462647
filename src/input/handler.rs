use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// A keypad press forwarded to the controller
    GameAction(Action),
    /// Show or hide the cycle overlay
    ToggleOverlay,
    Quit,
    None,
}

/// Maps terminal keys onto the five-button keypad
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameAction(Action::Up)
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameAction(Action::Down)
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameAction(Action::Left)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameAction(Action::Right)
            }

            // Center button
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::GameAction(Action::Confirm),

            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::ToggleOverlay,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), KeyAction::GameAction(Action::Up));
        assert_eq!(press(KeyCode::Down), KeyAction::GameAction(Action::Down));
        assert_eq!(press(KeyCode::Left), KeyAction::GameAction(Action::Left));
        assert_eq!(press(KeyCode::Right), KeyAction::GameAction(Action::Right));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(press(KeyCode::Char('w')), KeyAction::GameAction(Action::Up));
        assert_eq!(press(KeyCode::Char('S')), KeyAction::GameAction(Action::Down));
        assert_eq!(press(KeyCode::Char('a')), KeyAction::GameAction(Action::Left));
        assert_eq!(press(KeyCode::Char('D')), KeyAction::GameAction(Action::Right));
    }

    #[test]
    fn test_confirm_keys() {
        assert_eq!(press(KeyCode::Enter), KeyAction::GameAction(Action::Confirm));
        assert_eq!(press(KeyCode::Char(' ')), KeyAction::GameAction(Action::Confirm));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('c')), KeyAction::ToggleOverlay);

        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Tab), KeyAction::None);
    }
}
