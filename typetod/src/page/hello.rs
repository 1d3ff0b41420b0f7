use crossterm::event::Event;
use ratatui::{Frame, layout::Rect, text::Line, widgets::Paragraph};

use crate::app::Message;
use crate::screen::Transition;
use crate::utils::{KeyEventHelper, center_lines};

/// Page: Greeting, waits for any key
#[derive(Debug)]
pub struct Hello {
    user: String,
}

impl Hello {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
        }
    }

    fn lines(&self) -> [Line<'_>; 2] {
        [
            Line::from(format!("hello, {}! are you ready?", self.user)),
            Line::from("press any key..."),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let area = center_lines(area, &lines);
        frame.render_widget(Paragraph::new(lines.to_vec()), area);
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };

        if key.is_cancel() {
            Some(Message::Transition(Transition::Cancel))
        } else if key.is_press() {
            Some(Message::Transition(Transition::Proceed))
        } else {
            None
        }
    }
}
