use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::Line;

pub fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area_horizontal] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical])
        .flex(Flex::Center)
        .areas(area_horizontal);
    area
}

/// The centered area exactly fitting `lines`
pub fn center_lines(area: Rect, lines: &[Line]) -> Rect {
    let width = lines.iter().map(Line::width).max().unwrap_or_default();
    let width = u16::try_from(width).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    center(area, Constraint::Length(width), Constraint::Length(height))
}

/// A trait defining helper methods for keyevents
pub trait KeyEventHelper {
    /// Returns true if the keyevent contains a pressed key
    fn is_press(&self) -> bool;

    /// Returns true if the keyevent contains the given modifiers
    fn has_mods(&self, mods: KeyModifiers) -> bool;

    /// Returns true if the keyevent contains a character that matches the input
    fn is_char(&self, character: char) -> bool;

    /// Returns true if the keyevent matches the given character, and is being pressed
    fn is_press_char(&self, character: char) -> bool {
        self.is_press() && self.is_char(character)
    }

    /// Returns true if the keyevent matches the given character, and is being pressed with CTRL as
    /// a modifier.
    fn is_ctrl_press_char(&self, character: char) -> bool {
        self.has_mods(KeyModifiers::CONTROL) && self.is_press_char(character)
    }

    /// Escape or Ctrl-E
    fn is_cancel(&self) -> bool;
}

impl KeyEventHelper for KeyEvent {
    fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    fn is_char(&self, character: char) -> bool {
        self.code == KeyCode::Char(character)
    }

    fn has_mods(&self, mods: KeyModifiers) -> bool {
        self.modifiers.contains(mods)
    }

    fn is_cancel(&self) -> bool {
        (self.is_press() && self.code == KeyCode::Esc) || self.is_ctrl_press_char('e')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_keys() {
        assert!(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE).is_cancel());
        assert!(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL).is_cancel());
        assert!(!KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE).is_cancel());
        assert!(!KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL).is_cancel());
    }

    #[test]
    fn test_release_is_not_a_press() {
        let mut key = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE);
        assert!(key.is_press_char('y'));
        key.kind = KeyEventKind::Release;
        assert!(!key.is_press_char('y'));
        assert!(!key.is_cancel());
    }

    #[test]
    fn test_center_lines() {
        let area = Rect::new(0, 0, 40, 10);
        let lines = [Line::from("hello"), Line::from("press any key...")];
        assert_eq!(center_lines(area, &lines), Rect::new(12, 4, 16, 2));
    }
}
