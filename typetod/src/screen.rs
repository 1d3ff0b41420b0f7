//! Which screen follows which
//!
//! Pages report what happened as a [`Transition`]; [`Screen::next`] turns that into the next
//! screen. Nothing here touches the terminal.

use strum::Display;

#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Screen {
    #[default]
    Hello,
    Menu,
    Game,
    Result,
    Leave,
    Exit,
}

/// What a page reports when it is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Any key on a screen that only waits
    Proceed,
    /// Escape or Ctrl-E
    Cancel,
    /// An item was picked in the menu
    Selected,
    /// The session ran out of lines
    Finished,
    /// No sample could be fetched for a new game
    Exhausted,
    /// The answer to "again?"
    Again(bool),
}

/// The facts about the current run that steer the flow
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flow {
    pub browsable: bool,
    pub endless: bool,
    pub result_screen: bool,
    pub source_exhausted: bool,
}

impl Flow {
    pub const fn next_game(&self) -> Screen {
        if self.browsable && !self.endless {
            Screen::Menu
        } else {
            Screen::Game
        }
    }

    /// Whether the leave screen may offer another round
    pub const fn offers_again(&self) -> bool {
        !(self.source_exhausted || self.endless)
    }
}

impl Screen {
    pub const fn next(self, transition: Transition, flow: &Flow) -> Self {
        use Transition::*;

        match (self, transition) {
            (Self::Hello, Cancel) => Self::Exit,
            (Self::Hello, _) => flow.next_game(),

            (Self::Menu, Cancel) => Self::Leave,
            (Self::Menu, Selected) => Self::Game,

            (Self::Game, Cancel) if flow.endless && flow.result_screen => Self::Result,
            (Self::Game, Cancel | Exhausted) => Self::Leave,
            (Self::Game, Finished) if flow.result_screen => Self::Result,
            (Self::Game, Finished) => Self::Leave,

            (Self::Result, Proceed) => Self::Leave,

            (Self::Leave, Again(true)) if flow.offers_again() => flow.next_game(),
            (Self::Leave, Proceed | Cancel | Again(_)) => Self::Exit,

            (screen, _) => screen,
        }
    }
}
