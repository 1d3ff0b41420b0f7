//! # Scribe - A line-oriented typing engine
//!
//! Scribe is the engine behind a terminal typing game. Sample text flows in from a
//! [`ContentSource`](source::ContentSource), gets normalized and wrapped into display lines,
//! and is typed line by line in a [`TypingSession`](session::TypingSession). The session draws
//! into an attribute-cell [`Canvas`](canvas::Canvas) that any front end can paint.
//!
//! ## Pipeline
//!
#![doc = simple_mermaid::mermaid!("../diagrams/supply_pipeline.mmd")]
//!
//! ## Quick start
//!
//! ```rust
//! use scribe::{Configuration, Keystroke, TypingSession, ViewportGeometry};
//!
//! let geometry = ViewportGeometry::new(12, 40).unwrap();
//! let mut session = TypingSession::new(geometry, Configuration::default());
//!
//! session.add_sample("hi there");
//! session.start();
//!
//! assert_eq!(session.add_char('h'), Keystroke::Correct);
//! assert_eq!(session.add_char('x'), Keystroke::Wrong);
//! assert_eq!(session.get_errors(), 1);
//! ```

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod normalize;
pub mod score;
pub mod session;
pub mod source;
pub mod supplier;
pub mod wrap;

pub use canvas::{Attr, Canvas, Cell};
pub use config::{Configuration, SpeedUnit};
pub use geometry::{GeometryError, ViewportGeometry};
pub use normalize::normalize;
pub use score::{Score, Speed};
pub use session::{Keystroke, Phase, SharedSession, TypingSession};
pub use source::{
    ContentItem, ContentSource, FetchError, Generator, OnPop, Refill, ResourceQueue,
    SharedGenerator, SharedSource, refill,
};
pub use supplier::{SampleSupplier, SupplyReport};
pub use wrap::{WrapOptions, wrap};

use std::sync::{Mutex, MutexGuard, PoisonError};

const AVERAGE_WORD_LENGTH: f64 = 5.0;

/// Lock a shared session or source, recovering the guard if another thread panicked with it
pub fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
