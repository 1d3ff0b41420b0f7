use crossterm::event::Event;
use ratatui::{Frame, layout::Rect, text::Line, widgets::Paragraph};
use scribe::Score;

use crate::app::Message;
use crate::screen::Transition;
use crate::utils::{KeyEventHelper, center_lines};

/// Page: Final score of a game
#[derive(Debug)]
pub struct Summary {
    lines: Vec<String>,
}

impl Summary {
    pub fn new(score: &Score, endless: bool) -> Self {
        let headline = if endless { "you survived!" } else { "you did it!" };
        Self {
            lines: vec![
                headline.to_string(),
                format!("{:9} {:>8}", "speed:", score.speed.to_string()),
                format!("{:9} {:>6}", "accuracy:", score.accuracy_label()),
                format!("{:9} {:>5}", "typos:", score.errors_label()),
                "press any key...".to_string(),
            ],
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self
            .lines
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect::<Vec<_>>();
        let area = center_lines(area, &lines);
        frame.render_widget(Paragraph::new(lines), area);
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        match event {
            Event::Key(key) if key.is_press() => Some(Message::Transition(Transition::Proceed)),
            _ => None,
        }
    }
}
