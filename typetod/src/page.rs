use crossterm::event::Event;
use ratatui::{Frame, layout::Rect};

pub mod game;
pub mod hello;
pub mod leave;
pub mod menu;
pub mod summary;

pub use game::Game;
pub use hello::Hello;
pub use leave::Leave;
pub use menu::Menu;
pub use summary::Summary;

use crate::app::Message;

macro_rules! make_page_enum {
    ($($t:tt),*) => {
        pub enum Page {
            $(
                $t(Box<$t>),
            )*
        }

        $(
            impl From<$t> for Page {
                fn from(value: $t) -> Page {
                    Page::$t(Box::new(value))
                }
            }
        )*
    };
}

make_page_enum!(Hello, Menu, Game, Summary, Leave);

impl Page {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Hello(page) => page.render(frame, area),
            Self::Menu(page) => page.render(frame, area),
            Self::Game(page) => page.render(frame, area),
            Self::Summary(page) => page.render(frame, area),
            Self::Leave(page) => page.render(frame, area),
        }
    }

    pub fn handle_events(&mut self, event: &Event) -> Option<Message> {
        match self {
            Self::Hello(page) => page.handle_events(event),
            Self::Menu(page) => page.handle_events(event),
            Self::Game(page) => page.handle_events(event),
            Self::Summary(page) => page.handle_events(event),
            Self::Leave(page) => page.handle_events(event),
        }
    }

    pub fn poll(&mut self) -> Option<Message> {
        match self {
            Self::Game(page) => page.poll(),
            Self::Hello(_) | Self::Menu(_) | Self::Summary(_) | Self::Leave(_) => None,
        }
    }
}
