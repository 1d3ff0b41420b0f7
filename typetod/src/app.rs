use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Size;
use scribe::{Configuration, Score, SharedSource, Speed, lock};

use crate::config::Settings;
use crate::error::AppError;
use crate::page::{self, Page};
use crate::screen::{Flow, Screen, Transition};
use crate::utils::KeyEventHelper;

/// How long to wait for input before redrawing
const TICK: Duration = Duration::from_millis(100);

/// An app message
pub enum Message {
    /// The current page is done
    Transition(Transition),
    /// Ctrl-C, leave right away
    Quit,
}

/// How the app ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Finished,
    /// Ctrl-C
    Interrupted,
}

/// Everything pages need that outlives a single page
pub struct Context {
    pub settings: Settings,
    pub configuration: Configuration,
    pub source: SharedSource,
    pub user: String,
}

impl Context {
    pub fn new(settings: Settings, source: SharedSource, user: String) -> Self {
        Self {
            configuration: settings.configuration(),
            settings,
            source,
            user,
        }
    }

    pub fn flow(&self) -> Flow {
        let source = lock(&self.source);
        Flow {
            browsable: source.is_browsable(),
            endless: self.settings.endless,
            result_screen: self.settings.result_screen,
            source_exhausted: source.is_exhausted(),
        }
    }
}

/// The app itself
pub struct App {
    context: Context,
    screen: Screen,
    page: Page,
    last_score: Score,
}

impl App {
    /// Creates a new `App`, starting on the greeting
    pub fn new(context: Context) -> Self {
        let page = page::Hello::new(&context.user).into();
        let last_score = Score {
            speed: Speed::zero(context.configuration.speed_unit),
            accuracy: 0.0,
            errors: 0,
        };

        Self {
            context,
            screen: Screen::Hello,
            page,
            last_score,
        }
    }

    /// Runs the app until the player leaves
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<Ending, AppError> {
        execute!(stdout(), SetCursorStyle::SteadyBar)?;

        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                self.page.render(frame, area);
            })?;

            let event = event::poll(TICK)?.then(event::read).transpose()?;
            if let Some(message) = self.handle_events(event) {
                match message {
                    Message::Quit => return Ok(Ending::Interrupted),
                    Message::Transition(transition) => {
                        self.apply(transition, terminal.size()?)?;
                    }
                }
            }

            if self.screen == Screen::Exit {
                return Ok(Ending::Finished);
            }
        }
    }

    /// Global event handler
    fn handle_events(&mut self, event_opt: Option<Event>) -> Option<Message> {
        event_opt
            .and_then(|event| match &event {
                Event::Key(key) if key.is_ctrl_press_char('c') => Some(Message::Quit),
                _ => self.page.handle_events(&event),
            })
            .or_else(|| self.page.poll())
    }

    /// Move to the screen that follows `transition` and build its page
    fn apply(&mut self, transition: Transition, size: Size) -> Result<(), AppError> {
        if let Page::Game(game) = &self.page {
            self.last_score = game.finish();
        }

        let flow = self.context.flow();
        let next = self.screen.next(transition, &flow);
        tracing::debug!(from = %self.screen, to = %next, ?transition, "Screen transition");

        self.page = match next {
            Screen::Hello => page::Hello::new(&self.context.user).into(),
            Screen::Menu => page::Menu::new(self.context.source.clone()).into(),
            Screen::Game => page::Game::new(&self.context, size)?.into(),
            Screen::Result => page::Summary::new(&self.last_score, flow.endless).into(),
            Screen::Leave => page::Leave::new(flow.offers_again()).into(),
            Screen::Exit => {
                self.screen = next;
                return Ok(());
            }
        };
        self.screen = next;

        Ok(())
    }
}

/// Who is playing, for the greeting
pub fn user_name() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| "player".to_string())
}
