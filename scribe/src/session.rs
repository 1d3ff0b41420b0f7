//! # Session Module - Line-by-line typing evaluation
//!
//! A [`TypingSession`] owns a scrolling window of wrapped sample lines, the input typed for the
//! active line and the score counters. Every keystroke is classified against the active line
//! and drawn into the session's [`Canvas`].
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! ## Line advance
//!
//! The buffer is seeded with one empty line per history row plus one. [`TypingSession::start`]
//! pops the first of them, so the first real sample line lands on the active row once the
//! history rows have scrolled past. A line only advances when the input equals the whole active
//! line and the player presses space or enter.
//!
//! ```rust
//! use scribe::{Configuration, Keystroke, TypingSession, ViewportGeometry};
//!
//! // 4 rows leave no history, so the first sample line is active right away
//! let geometry = ViewportGeometry::new(4, 20).unwrap();
//! let mut session = TypingSession::new(geometry, Configuration::default());
//! session.add_sample("ab");
//! session.start();
//! session.add_char('a');
//! session.add_char('b');
//! assert_eq!(session.add_char(' '), Keystroke::LineAdvance);
//! assert!(session.is_over());
//! ```

use std::collections::VecDeque;
use std::iter;
use std::sync::{Arc, Mutex};

use crate::canvas::{Attr, Canvas};
use crate::config::Configuration;
use crate::geometry::ViewportGeometry;
use crate::normalize::normalize;
use crate::score::{Score, ScoreTracker, Speed};
use crate::wrap::wrap;

/// A session shared between the front end and a [`SampleSupplier`](crate::SampleSupplier)
pub type SharedSession = Arc<Mutex<TypingSession>>;

/// Maximum number of typed characters before the morph preview kicks in
const MORPH_LIMIT: usize = 40;

/// Where a session is in its life
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Over,
}

/// Classification of a single keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Matched the active line
    Correct,
    /// Placed, but does not match the active line
    Wrong,
    /// Could not be placed. Also returned for keystrokes outside a running session, which are
    /// not counted at all.
    Rejected,
    /// Completed the active line
    LineAdvance,
}

/// A running game of typing
///
/// # Examples
///
/// ```rust
/// use scribe::{Configuration, Keystroke, TypingSession, ViewportGeometry};
///
/// let geometry = ViewportGeometry::new(10, 40).unwrap();
/// let mut session = TypingSession::new(geometry, Configuration::default());
/// session.add_sample("hello");
/// session.start();
///
/// for c in "helo".chars() {
///     session.add_char(c);
/// }
/// assert_eq!(session.input(), "helo");
/// assert_eq!(session.get_errors(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TypingSession {
    geometry: ViewportGeometry,
    config: Configuration,
    /// Sample lines; the active line sits at index `history_rows`
    lines: VecDeque<String>,
    /// What was typed for the active line
    input: String,
    canvas: Canvas,
    score: ScoreTracker,
    phase: Phase,
}

impl TypingSession {
    /// Create an idle session laid out on `geometry`
    pub fn new(geometry: ViewportGeometry, config: Configuration) -> Self {
        let seeded = geometry.history_rows() + 1;
        let canvas = Canvas::new(geometry.height(), geometry.width());
        let score = ScoreTracker::new(config.speed_unit);

        Self {
            lines: iter::repeat_n(String::new(), seeded).collect(),
            input: String::new(),
            geometry,
            config,
            canvas,
            score,
            phase: Phase::Idle,
        }
    }

    /// Normalize, wrap and append a sample. Returns the number of lines appended.
    pub fn add_sample(&mut self, raw: &str) -> usize {
        let lines = Self::layout(&self.config, self.geometry.width(), raw);
        self.append_lines(lines)
    }

    /// Normalize and wrap a sample into lines at most `width` wide
    ///
    /// Touches no session state, so a producer can lay out a large sample before locking the
    /// session. Without sample separation a lone blank line is kept as one empty line, even
    /// when empty lines are otherwise dropped.
    pub fn layout(config: &Configuration, width: u16, raw: &str) -> Vec<String> {
        if !config.separate_samples && matches!(raw, "\n" | "\r\n") {
            return vec![String::new()];
        }
        wrap(&normalize(raw), width as usize, &config.wrap_options())
    }

    /// Append lines from [`TypingSession::layout`], preceded by a separator line when samples
    /// are separated. Returns the number of lines appended.
    pub fn append_lines(&mut self, wrapped: Vec<String>) -> usize {
        let mut added = 0;
        if self.config.separate_samples
            && self.config.keep_empty_lines
            && self.lines.back().is_some_and(|line| !line.is_empty())
        {
            self.lines.push_back(String::new());
            added += 1;
        }

        added += wrapped.len();
        self.lines.extend(wrapped);
        added
    }

    /// Start the clock and draw the first window
    ///
    /// A session started without any sample line is over right away.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.new_line();
        self.score.start();
        tracing::debug!(lines = self.lines.len(), "Typing session started");
        self.check_over();
    }

    /// Evaluate a keystroke against the active line
    pub fn add_char(&mut self, ch: char) -> Keystroke {
        if self.phase != Phase::Running {
            return Keystroke::Rejected;
        }

        self.score.count_keystroke();

        let input_len = self.input.chars().count();
        let active_len = self.active().chars().count();
        let width = self.geometry.width() as usize;

        let keystroke = if (ch == ' ' || ch == '\n') && self.input == self.active() {
            self.new_line();
            Keystroke::LineAdvance
        } else if ch == '\n' || input_len >= width || input_len >= active_len {
            self.score.count_error();
            Keystroke::Rejected
        } else if ch == '\t' {
            let mut correct = true;
            for _ in 0..self.config.tab_width {
                correct &= self.push_char(' ');
                if self.input.chars().count() >= active_len {
                    break;
                }
            }
            if correct {
                Keystroke::Correct
            } else {
                self.score.count_error();
                Keystroke::Wrong
            }
        } else if self.push_char(ch) {
            Keystroke::Correct
        } else {
            self.score.count_error();
            Keystroke::Wrong
        };

        if self.config.morphing {
            self.morph();
        }
        self.check_over();

        keystroke
    }

    /// Remove the last typed character
    pub fn del_char(&mut self) {
        if self.input.pop().is_some() {
            let row = self.geometry.input_row();
            let col = self.input_col();
            self.canvas.move_cursor(row, col);
            self.canvas.clear_to_end(row, col);
        }
        if self.config.morphing {
            self.morph();
        }
    }

    /// Throw away everything typed for the active line
    pub fn clear_input_line(&mut self) {
        if self.config.morphing {
            self.draw_active_line();
        }
        self.input.clear();
        let row = self.geometry.input_row();
        self.canvas.move_cursor(row, 0);
        self.canvas.clear_to_end(row, 0);
    }

    /// Freeze and return the speed. Only the first call computes it.
    pub fn save_result(&mut self) -> Speed {
        self.score.freeze()
    }

    pub fn get_speed(&self) -> Speed {
        self.score.speed()
    }

    pub fn get_accuracy(&self) -> f64 {
        self.score.accuracy()
    }

    pub fn get_errors(&self) -> u64 {
        self.score.errors()
    }

    pub fn score(&self) -> Score {
        self.score.score()
    }

    /// True when the buffer is running low and should be refilled
    pub fn is_almost_over(&self) -> bool {
        self.lines.len() < self.geometry.sample_rows().len() + 4
    }

    /// True when no active line is left
    pub fn is_over(&self) -> bool {
        self.lines.len() <= self.geometry.history_rows()
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The line being typed, if the session still has one
    pub fn active_line(&self) -> Option<&str> {
        self.lines
            .get(self.geometry.history_rows())
            .map(String::as_str)
    }

    /// Number of lines in the buffer, history and active line included
    pub fn buffered_lines(&self) -> usize {
        self.lines.len()
    }

    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub const fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    fn active(&self) -> &str {
        self.active_line().unwrap_or_default()
    }

    fn input_col(&self) -> u16 {
        u16::try_from(self.input.chars().count()).unwrap_or(u16::MAX)
    }

    /// Append a character to the input and draw it. Returns whether it matched.
    fn push_char(&mut self, ch: char) -> bool {
        let col = self.input.chars().count();
        let correct = self.active().chars().nth(col) == Some(ch);
        self.input.push(ch);

        let attr = if correct {
            Attr::Normal
        } else {
            self.config.error_attr
        };
        self.canvas.write_char(ch, attr);
        correct
    }

    /// Advance to the next line and redraw the whole window
    fn new_line(&mut self) {
        self.input.clear();
        self.lines.pop_front();
        self.canvas.erase();

        for (line, &row) in self.lines.iter().zip(self.geometry.sample_rows()) {
            self.canvas.put_str(row, 0, line, Attr::Normal);
        }

        let separator = iter::repeat_n(self.config.separator, self.geometry.width() as usize)
            .collect::<String>();
        for row in self.geometry.separator_rows() {
            self.canvas.put_str(row, 0, &separator, Attr::Normal);
        }

        self.canvas.move_cursor(self.geometry.input_row(), 0);
        tracing::trace!(remaining = self.lines.len(), "Line advanced");
    }

    /// Preview the next line over the active one as the input grows past the threshold
    fn morph(&mut self) {
        let history = self.geometry.history_rows();
        if self.lines.len() <= history + 1 {
            return;
        }

        let threshold = (self.geometry.width() as usize / 2).min(MORPH_LIMIT);
        let typed = self.input.chars().count();

        if typed > threshold {
            self.draw_active_line();
            let overlay = self.lines[history + 1]
                .chars()
                .chain(iter::repeat(' '))
                .take(typed - threshold)
                .collect::<String>();
            let row = self.geometry.active_row();
            let end = self.canvas.put_str(row, 0, &overlay, Attr::Normal);
            self.canvas.put_cell(row, end, ' ', Attr::Reverse);
        } else if typed == threshold {
            self.draw_active_line();
        }
    }

    fn draw_active_line(&mut self) {
        let row = self.geometry.active_row();
        let active = self
            .lines
            .get(self.geometry.history_rows())
            .map_or("", String::as_str);
        self.canvas.clear_to_end(row, 0);
        self.canvas.put_str(row, 0, active, Attr::Normal);
    }

    fn check_over(&mut self) {
        if self.phase == Phase::Running && self.is_over() {
            let speed = self.save_result();
            self.phase = Phase::Over;
            tracing::debug!(%speed, errors = self.score.errors(), "Typing session over");
        }
    }
}
