use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use scribe::{SharedSource, lock};

use crate::app::Message;
use crate::screen::Transition;
use crate::utils::KeyEventHelper;

/// Page: Pick the next sample by title
pub struct Menu {
    titles: Vec<String>,
    index: usize,
    source: SharedSource,
}

impl Menu {
    pub fn new(source: SharedSource) -> Self {
        let titles = lock(&source).titles();
        Self {
            titles,
            index: 0,
            source,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = area.height as usize;
        let offset = scroll_offset(self.titles.len(), self.index, height);

        let lines = self
            .titles
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, title)| {
                let style = if i == self.index {
                    Style::new().reversed()
                } else {
                    Style::new()
                };
                Line::styled(label(title, area.width as usize), style)
            })
            .collect::<Vec<_>>();

        frame.render_widget(Paragraph::new(lines), area);

        let row = u16::try_from(self.index.saturating_sub(offset)).unwrap_or_default();
        frame.set_cursor_position(Position::new(area.x, area.y + row));
    }

    pub fn handle_events(&mut self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        match key.code {
            _ if key.is_cancel() => return Some(Message::Transition(Transition::Cancel)),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.index < self.titles.len() {
                    lock(&self.source).select(self.index);
                }
                tracing::debug!(index = self.index, "Sample selected");
                return Some(Message::Transition(Transition::Selected));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.index = (self.index + 1).min(self.titles.len().saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => self.index = self.index.saturating_sub(1),
            _ => {}
        }

        None
    }
}

/// `> title`, shortened with `...` when it would not fit
fn label(title: &str, width: usize) -> String {
    if title.chars().count() + 2 < width {
        format!("> {title}")
    } else {
        let kept = title.chars().take(width.saturating_sub(6)).collect::<String>();
        format!("> {kept}...")
    }
}

/// First visible row, keeping the selection near the middle of the screen
const fn scroll_offset(len: usize, index: usize, height: usize) -> usize {
    if len.saturating_sub(1).saturating_sub(index) <= height.saturating_sub(1) / 2 {
        len.saturating_sub(height)
    } else if index >= height / 2 {
        index - height / 2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crossterm::event::{KeyEvent, KeyModifiers};
    use scribe::{ContentItem, FetchError, OnPop, ResourceQueue};

    use super::*;

    struct Title(&'static str);

    impl ContentItem for Title {
        fn title(&self) -> &str {
            self.0
        }

        fn fetch_body(&self) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    fn menu(titles: &[&'static str]) -> Menu {
        let items = titles
            .iter()
            .copied()
            .map(|title| Box::new(Title(title)) as Box<dyn ContentItem>);
        Menu::new(Arc::new(Mutex::new(ResourceQueue::new(items, OnPop::Remove))))
    }

    fn press(menu: &mut Menu, code: KeyCode) -> Option<Message> {
        menu.handle_events(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_label() {
        assert_eq!(label("short", 20), "> short");
        assert_eq!(label("a rather long title", 20), "> a rather long ...");
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(5, 4, 10), 0);
        assert_eq!(scroll_offset(30, 0, 10), 0);
        assert_eq!(scroll_offset(30, 4, 10), 0);
        assert_eq!(scroll_offset(30, 12, 10), 7);
        assert_eq!(scroll_offset(30, 26, 10), 20);
        assert_eq!(scroll_offset(30, 29, 10), 20);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut menu = menu(&["one", "two", "three"]);
        press(&mut menu, KeyCode::Up);
        assert_eq!(menu.index, 0);
        for _ in 0..5 {
            press(&mut menu, KeyCode::Char('j'));
        }
        assert_eq!(menu.index, 2);
        press(&mut menu, KeyCode::Char('k'));
        assert_eq!(menu.index, 1);
    }

    #[test]
    fn test_select_moves_item_to_front() {
        let mut menu = menu(&["one", "two", "three"]);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);

        assert!(matches!(
            press(&mut menu, KeyCode::Char(' ')),
            Some(Message::Transition(Transition::Selected))
        ));
        assert_eq!(lock(&menu.source).titles(), vec!["three", "one", "two"]);
    }

    #[test]
    fn test_cancel() {
        let mut menu = menu(&["one"]);
        assert!(matches!(
            press(&mut menu, KeyCode::Esc),
            Some(Message::Transition(Transition::Cancel))
        ));
        assert_eq!(lock(&menu.source).titles(), vec!["one"]);
    }
}
