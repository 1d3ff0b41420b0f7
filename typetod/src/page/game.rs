use std::sync::{Arc, Mutex};

use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Position, Rect, Size},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::Widget,
};
use scribe::{
    Attr, Canvas, SampleSupplier, Score, SharedSession, SharedSource, TypingSession,
    ViewportGeometry, lock, refill,
};

use crate::app::{Context, Message};
use crate::error::AppError;
use crate::screen::Transition;
use crate::utils::KeyEventHelper;

/// Page: The typing session itself
pub struct Game {
    session: SharedSession,
    _supplier: Option<SampleSupplier>,
    status_bar: bool,
    endless: bool,
    outcome: Option<Transition>,
}

impl Game {
    /// Set up a session sized to `size`, seeded with the next sample of the source
    pub fn new(context: &Context, size: Size) -> Result<Self, AppError> {
        let status_bar = context.settings.status_bar;
        let endless = context.settings.endless;

        let height = size.height.saturating_sub(u16::from(status_bar));
        let geometry = ViewportGeometry::new(height, size.width)?;
        let mut session = TypingSession::new(geometry, context.configuration);

        let outcome = match first_sample(&context.source) {
            Some(body) => {
                session.add_sample(&body);
                session.start();
                None
            }
            None => {
                tracing::info!("No sample left for a new game");
                Some(Transition::Exhausted)
            }
        };

        let session = Arc::new(Mutex::new(session));
        let supplier = if endless && outcome.is_none() {
            Some(SampleSupplier::spawn(
                Arc::clone(&session),
                Arc::clone(&context.source),
                SampleSupplier::DEFAULT_INTERVAL,
            )?)
        } else {
            None
        };

        Ok(Self {
            session,
            _supplier: supplier,
            status_bar,
            endless,
            outcome,
        })
    }

    /// Freeze the score and hand it out
    pub fn finish(&self) -> Score {
        let mut session = lock(&self.session);
        session.save_result();
        session.score()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let session = lock(&self.session);
        let canvas = session.canvas();

        let notebook = Rect {
            width: canvas.width().min(area.width),
            height: canvas.height().min(area.height),
            ..area
        };
        frame.render_widget(CanvasView(canvas), notebook);

        let (row, col) = canvas.cursor();
        frame.set_cursor_position(Position::new(notebook.x + col, notebook.y + row));

        if self.status_bar && area.height > 0 {
            let score = session.score();
            let bar = Rect {
                y: area.bottom() - 1,
                height: 1,
                ..area
            };
            let text = format!(
                "speed: {}, accur: {}, typos: {} ",
                score.speed,
                score.accuracy_label(),
                score.errors_label()
            );
            frame.render_widget(Line::from(text).reversed(), bar);
        }
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        if key.is_cancel() {
            if self.endless {
                lock(&self.session).save_result();
            }
            return Some(Message::Transition(Transition::Cancel));
        }

        let mut session = lock(&self.session);
        match key.code {
            KeyCode::Char('u') if key.has_mods(KeyModifiers::CONTROL) => {
                session.clear_input_line();
            }
            KeyCode::Backspace | KeyCode::Delete => session.del_char(),
            KeyCode::Enter => {
                session.add_char('\n');
            }
            KeyCode::Tab => {
                session.add_char('\t');
            }
            KeyCode::Char(ch)
                if (' '..='~').contains(&ch)
                    && !key.has_mods(KeyModifiers::CONTROL)
                    && !key.has_mods(KeyModifiers::ALT) =>
            {
                session.add_char(ch);
            }
            _ => {}
        }

        None
    }

    pub fn poll(&mut self) -> Option<Message> {
        self.outcome
            .take()
            .or_else(|| {
                lock(&self.session)
                    .is_over()
                    .then_some(Transition::Finished)
            })
            .map(Message::Transition)
    }
}

/// Fetch bodies until one works or the source runs dry
fn first_sample(source: &SharedSource) -> Option<String> {
    loop {
        let item = {
            let mut source = lock(source);
            if !source.has_next() {
                return None;
            }
            source.pop_next()?
        };
        refill(source);

        match item.fetch_body() {
            Ok(body) if body.is_empty() && lock(source).is_exhausted() => return None,
            Ok(body) => return Some(body),
            Err(error) => tracing::warn!(title = item.title(), %error, "Skipping sample"),
        }
    }
}

const fn attr_style(attr: Attr) -> Style {
    match attr {
        Attr::Normal => Style::new(),
        Attr::Reverse => Style::new().add_modifier(Modifier::REVERSED),
        Attr::Bold => Style::new().add_modifier(Modifier::BOLD),
        Attr::Underline => Style::new().add_modifier(Modifier::UNDERLINED),
        Attr::Blink => Style::new().add_modifier(Modifier::SLOW_BLINK),
    }
}

/// Paints a canvas cell by cell
struct CanvasView<'a>(&'a Canvas);

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (y, cells) in (area.top()..area.bottom()).zip(self.0.rows()) {
            for (x, cell) in (area.left()..area.right()).zip(cells) {
                if let Some(target) = buf.cell_mut((x, y)) {
                    target.set_char(cell.ch).set_style(attr_style(cell.attr));
                }
            }
        }
    }
}
