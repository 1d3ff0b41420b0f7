//! # Source Module - Where sample text comes from
//!
//! A [`ContentSource`] is a FIFO of [`ContentItem`]s. Items only carry a title up front; their
//! body is fetched on demand, possibly slowly (disk, network, a subprocess). The standard source
//! is a [`ResourceQueue`], whose [`OnPop`] strategy decides whether a popped item is gone for
//! good or replaced by a freshly generated one. Replacements for popped items are owed until
//! [`refill`] generates them with the source unlocked.
//!
//! ```rust
//! use scribe::{ContentItem, ContentSource, FetchError, OnPop, ResourceQueue};
//!
//! struct Quote(&'static str);
//!
//! impl ContentItem for Quote {
//!     fn title(&self) -> &str {
//!         self.0
//!     }
//!
//!     fn fetch_body(&self) -> Result<String, FetchError> {
//!         Ok(self.0.to_string())
//!     }
//! }
//!
//! let mut queue = ResourceQueue::new(
//!     vec![Box::new(Quote("one")) as Box<dyn ContentItem>, Box::new(Quote("two"))],
//!     OnPop::Remove,
//! );
//! queue.select(1);
//! assert_eq!(queue.titles(), vec!["two", "one"]);
//! assert_eq!(queue.pop_next().unwrap().fetch_body().unwrap(), "two");
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::lock;

/// A source shared between the front end and a [`SampleSupplier`](crate::SampleSupplier)
pub type SharedSource = Arc<Mutex<dyn ContentSource>>;

/// A generator behind its own lock, so it can run while its queue is unlocked
pub type SharedGenerator = Arc<Mutex<dyn Generator>>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Could not read '{}': {error}", path.display())]
    Read { path: PathBuf, error: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Command '{program}' failed: {error}")]
    Command { program: String, error: String },

    #[error("{0}")]
    Failed(String),
}

/// A piece of sample text with a short label
pub trait ContentItem: Send {
    fn title(&self) -> &str;

    /// Load the full text. May block.
    fn fetch_body(&self) -> Result<String, FetchError>;
}

/// Produces fresh items for regenerating queues
pub trait Generator: Send {
    fn generate(&mut self) -> Result<Box<dyn ContentItem>, FetchError>;
}

/// A queue of content items
pub trait ContentSource: Send {
    fn has_next(&self) -> bool;

    fn pop_next(&mut self) -> Option<Box<dyn ContentItem>>;

    /// Titles of the queued items, front first
    fn titles(&self) -> Vec<String> {
        Vec::new()
    }

    /// Move the item at `index` to the front
    fn select(&mut self, _index: usize) {}

    /// Whether the player may pick items from a menu
    fn is_browsable(&self) -> bool {
        false
    }

    /// True once the source can never yield another item
    fn is_exhausted(&self) -> bool {
        !self.has_next()
    }

    /// Hand out the replacements owed for popped items, if generating them is slow
    fn take_refill(&mut self) -> Option<Refill> {
        None
    }

    /// Take back items generated from a [`Refill`]
    fn restock(&mut self, _items: Vec<Box<dyn ContentItem>>) {}
}

/// Replacement items owed by a source, generated without holding the source lock
pub struct Refill {
    generator: SharedGenerator,
    owed: usize,
}

impl Refill {
    pub const fn owed(&self) -> usize {
        self.owed
    }

    /// Run the generator once per owed item. Failures are logged and dropped.
    pub fn generate(self) -> Vec<Box<dyn ContentItem>> {
        (0..self.owed)
            .filter_map(|_| generate_one(&self.generator))
            .collect()
    }
}

/// Generate what `source` owes with the source unlocked, then restock it
///
/// Returns the number of items added.
pub fn refill(source: &SharedSource) -> usize {
    let Some(refill) = lock(source).take_refill() else {
        return 0;
    };

    let items = refill.generate();
    let added = items.len();
    lock(source).restock(items);
    added
}

fn generate_one(generator: &SharedGenerator) -> Option<Box<dyn ContentItem>> {
    match lock(generator).generate() {
        Ok(item) => Some(item),
        Err(error) => {
            tracing::warn!(%error, "Could not generate a replacement item");
            None
        }
    }
}

/// What a [`ResourceQueue`] does with the slot of a popped item
pub enum OnPop {
    /// The item is gone; the queue drains
    Remove,
    /// A freshly generated item takes its place; the queue never drains
    Replace(SharedGenerator),
}

impl fmt::Debug for OnPop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove => f.write_str("Remove"),
            Self::Replace(_) => f.write_str("Replace(..)"),
        }
    }
}

impl OnPop {
    pub fn replace(generator: impl Generator + 'static) -> Self {
        Self::Replace(Arc::new(Mutex::new(generator)))
    }
}

/// The standard browsable [`ContentSource`]
pub struct ResourceQueue {
    items: VecDeque<Box<dyn ContentItem>>,
    on_pop: OnPop,
    /// Popped items not replaced yet
    owed: usize,
}

impl ResourceQueue {
    pub fn new(items: impl IntoIterator<Item = Box<dyn ContentItem>>, on_pop: OnPop) -> Self {
        Self {
            items: items.into_iter().collect(),
            on_pop,
            owed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn on_pop(&self) -> &OnPop {
        &self.on_pop
    }
}

impl fmt::Debug for ResourceQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceQueue")
            .field("titles", &self.titles())
            .field("on_pop", &self.on_pop)
            .field("owed", &self.owed)
            .finish()
    }
}

impl ContentSource for ResourceQueue {
    fn has_next(&self) -> bool {
        !self.items.is_empty()
    }

    fn pop_next(&mut self) -> Option<Box<dyn ContentItem>> {
        let item = self.items.pop_front()?;
        if matches!(self.on_pop, OnPop::Replace(_)) {
            self.owed += 1;
        }
        Some(item)
    }

    fn titles(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.title().to_string())
            .collect()
    }

    fn select(&mut self, index: usize) {
        let Some(item) = self.items.remove(index) else {
            return;
        };
        let fresh = match &self.on_pop {
            OnPop::Replace(generator) => generate_one(generator),
            OnPop::Remove => None,
        };
        if let Some(fresh) = fresh {
            self.items.insert(index, fresh);
        }
        self.items.push_front(item);
    }

    fn is_browsable(&self) -> bool {
        true
    }

    fn is_exhausted(&self) -> bool {
        self.items.is_empty() && self.owed == 0
    }

    fn take_refill(&mut self) -> Option<Refill> {
        let OnPop::Replace(generator) = &self.on_pop else {
            return None;
        };
        if self.owed == 0 {
            return None;
        }

        Some(Refill {
            generator: Arc::clone(generator),
            owed: std::mem::take(&mut self.owed),
        })
    }

    fn restock(&mut self, items: Vec<Box<dyn ContentItem>>) {
        self.items.extend(items);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// Item whose body is its title
    pub(crate) struct Text(pub String);

    impl ContentItem for Text {
        fn title(&self) -> &str {
            &self.0
        }

        fn fetch_body(&self) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }
    }

    /// Item that can never be fetched
    pub(crate) struct Broken;

    impl ContentItem for Broken {
        fn title(&self) -> &str {
            "broken"
        }

        fn fetch_body(&self) -> Result<String, FetchError> {
            Err(FetchError::Failed("unavailable".into()))
        }
    }

    struct Counter(usize);

    impl Generator for Counter {
        fn generate(&mut self) -> Result<Box<dyn ContentItem>, FetchError> {
            self.0 += 1;
            Ok(Box::new(Text(format!("fresh {}", self.0))))
        }
    }

    /// Records whether its queue was unlocked while generating
    struct Peeking {
        source: Arc<OnceLock<SharedSource>>,
        unlocked: Arc<AtomicBool>,
    }

    impl Generator for Peeking {
        fn generate(&mut self) -> Result<Box<dyn ContentItem>, FetchError> {
            if let Some(source) = self.source.get() {
                self.unlocked.store(source.try_lock().is_ok(), Ordering::SeqCst);
            }
            Ok(Box::new(Text("fresh".into())))
        }
    }

    struct Failing;

    impl Generator for Failing {
        fn generate(&mut self) -> Result<Box<dyn ContentItem>, FetchError> {
            Err(FetchError::Command {
                program: "fortune".into(),
                error: "not found".into(),
            })
        }
    }

    pub(crate) fn texts(titles: &[&str]) -> Vec<Box<dyn ContentItem>> {
        titles
            .iter()
            .map(|title| Box::new(Text((*title).to_string())) as Box<dyn ContentItem>)
            .collect()
    }

    #[test]
    fn test_remove_queue_drains() {
        let mut queue = ResourceQueue::new(texts(&["a", "b"]), OnPop::Remove);
        assert!(queue.is_browsable());
        assert_eq!(queue.pop_next().unwrap().title(), "a");
        assert_eq!(queue.pop_next().unwrap().title(), "b");
        assert!(queue.pop_next().is_none());
        assert!(!queue.has_next());
        assert!(queue.is_exhausted());
    }

    fn shared(queue: ResourceQueue) -> SharedSource {
        Arc::new(Mutex::new(queue))
    }

    #[test]
    fn test_replace_queue_never_drains() {
        let source = shared(ResourceQueue::new(texts(&["a", "b"]), OnPop::replace(Counter(0))));

        assert_eq!(lock(&source).pop_next().unwrap().title(), "a");
        assert_eq!(lock(&source).titles(), vec!["b"]);
        assert!(!lock(&source).is_exhausted());
        assert_eq!(refill(&source), 1);
        assert_eq!(lock(&source).titles(), vec!["b", "fresh 1"]);

        lock(&source).pop_next();
        lock(&source).pop_next();
        assert!(!lock(&source).has_next());
        assert!(!lock(&source).is_exhausted());
        assert_eq!(refill(&source), 2);
        assert_eq!(lock(&source).titles(), vec!["fresh 2", "fresh 3"]);

        // Nothing owed
        assert_eq!(refill(&source), 0);
    }

    #[test]
    fn test_remove_queue_owes_nothing() {
        let mut queue = ResourceQueue::new(texts(&["a"]), OnPop::Remove);
        queue.pop_next();
        assert!(queue.take_refill().is_none());
        assert!(queue.is_exhausted());
    }

    #[test]
    fn test_failed_generation_shrinks_queue() {
        let source = shared(ResourceQueue::new(texts(&["a", "b"]), OnPop::replace(Failing)));
        lock(&source).pop_next();
        assert_eq!(refill(&source), 0);
        assert_eq!(lock(&source).titles(), vec!["b"]);
    }

    #[test]
    fn test_refill_generates_with_source_unlocked() {
        let slot = Arc::new(OnceLock::new());
        let unlocked = Arc::new(AtomicBool::new(false));
        let generator = Peeking {
            source: Arc::clone(&slot),
            unlocked: Arc::clone(&unlocked),
        };
        let source = shared(ResourceQueue::new(texts(&["a"]), OnPop::replace(generator)));
        assert!(slot.set(Arc::clone(&source)).is_ok());

        let item = lock(&source).pop_next().unwrap();
        assert_eq!(item.title(), "a");
        assert_eq!(refill(&source), 1);
        assert!(unlocked.load(Ordering::SeqCst));
        assert_eq!(lock(&source).titles(), vec!["fresh"]);
    }

    #[test]
    fn test_select_with_remove() {
        let mut queue = ResourceQueue::new(texts(&["a", "b", "c"]), OnPop::Remove);
        queue.select(2);
        assert_eq!(queue.titles(), vec!["c", "a", "b"]);

        // Out of range is ignored
        queue.select(7);
        assert_eq!(queue.titles(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_select_with_replace_refills_slot() {
        let mut queue = ResourceQueue::new(
            texts(&["a", "b", "c"]),
            OnPop::replace(Counter(0)),
        );
        queue.select(1);
        assert_eq!(queue.titles(), vec!["b", "a", "fresh 1", "c"]);
        assert_eq!(queue.pop_next().unwrap().title(), "b");
    }

    #[test]
    fn test_fetch_error_messages() {
        let error = FetchError::Read {
            path: PathBuf::from("missing.txt"),
            error: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(error.to_string(), "Could not read 'missing.txt': no such file");
        assert_eq!(Broken.fetch_body().unwrap_err().to_string(), "unavailable");
    }
}
