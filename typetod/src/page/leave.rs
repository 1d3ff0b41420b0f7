use crossterm::event::{Event, KeyCode};
use ratatui::{Frame, layout::Position, layout::Rect, text::Line, widgets::Paragraph};

use crate::app::Message;
use crate::screen::Transition;
use crate::utils::{KeyEventHelper, center_lines};

const AGAIN_PROMPT: &str = "again? (y/n): ";
const ANY_KEY_PROMPT: &str = "press any key...";

/// Page: End of a game, maybe asking for another round
#[derive(Debug)]
pub struct Leave {
    offers_again: bool,
}

impl Leave {
    pub const fn new(offers_again: bool) -> Self {
        Self { offers_again }
    }

    const fn prompt(&self) -> &'static str {
        if self.offers_again {
            AGAIN_PROMPT
        } else {
            ANY_KEY_PROMPT
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = [Line::from("leaving a game..."), Line::from(self.prompt())];
        let area = center_lines(area, &lines);
        frame.render_widget(Paragraph::new(lines.to_vec()), area);

        if self.offers_again {
            let column = u16::try_from(AGAIN_PROMPT.len()).unwrap_or_default();
            frame.set_cursor_position(Position::new(area.x + column, area.y + 1));
        }
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        if !self.offers_again {
            return Some(Message::Transition(Transition::Proceed));
        }

        let transition = match key.code {
            _ if key.is_cancel() => Transition::Cancel,
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Transition::Again(true),
            KeyCode::Char('n' | 'N') => Transition::Again(false),
            _ => return None,
        };
        Some(Message::Transition(transition))
    }
}
