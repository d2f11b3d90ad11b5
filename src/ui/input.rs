use crate::ui::message::AppMessage;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent, editing: bool) -> Option<AppMessage> {
        if editing {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(AppMessage::Quit)
                }
                KeyCode::Enter => Some(AppMessage::SubmitSearch),
                KeyCode::Esc => Some(AppMessage::CancelSearch),
                KeyCode::Backspace => Some(AppMessage::InputBackspace),
                KeyCode::Char(c) => Some(AppMessage::InputChar(c)),
                _ => None,
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char('q'), _) => Some(AppMessage::Quit),
            (KeyCode::Char('/'), _) => Some(AppMessage::EditSearch),
            (KeyCode::Esc, _) => Some(AppMessage::CancelSearch),
            (KeyCode::Char('r'), _) => Some(AppMessage::Refresh),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(AppMessage::MoveDown),
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(AppMessage::MoveUp),
            (KeyCode::Char('g'), _) => Some(AppMessage::SelectFirst),
            (KeyCode::Char('G'), _) => Some(AppMessage::SelectLast),
            _ => None,
        }
    }
}
