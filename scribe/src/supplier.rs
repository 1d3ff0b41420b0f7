//! # Supplier Module - Keeping the sample buffer topped up
//!
//! In endless play the buffer of a [`TypingSession`](crate::TypingSession) must never run dry,
//! but content may be slow to fetch. A [`SampleSupplier`] runs on its own thread: every few
//! seconds it checks the session's low-water mark and, while it is reached, moves items from
//! the [`ContentSource`](crate::ContentSource) into the session.
//!
//! Locks are only held for bookkeeping. Bodies are fetched, laid out and regenerated with
//! neither the session nor the source locked, so the render loop never waits on the network,
//! a subprocess or the wrapping of a large sample.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::lock;
use crate::session::{Phase, SharedSession, TypingSession};
use crate::source::{SharedSource, refill};

/// Outcome of one supply cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SupplyReport {
    /// Items taken from the source
    pub items: usize,
    /// Lines appended to the session
    pub lines: usize,
    /// Items whose body could not be fetched
    pub skipped: usize,
    /// The source has nothing left
    pub exhausted: bool,
}

/// Background producer feeding a shared session
///
/// The thread stops at its next wake-up once the supplier is dropped. It is never joined, as it
/// may be blocked inside a fetch.
#[derive(Debug)]
pub struct SampleSupplier {
    _stop: Sender<()>,
}

impl SampleSupplier {
    /// 80 characters at 200 wpm take 4.8 seconds
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(4);

    /// Run a single supply cycle on the calling thread
    pub fn supply(session: &SharedSession, source: &SharedSource) -> SupplyReport {
        let mut report = SupplyReport::default();

        loop {
            let (config, width) = {
                let session = lock(session);
                if session.phase() == Phase::Over || !session.is_almost_over() {
                    break;
                }
                (*session.configuration(), session.geometry().width())
            };

            let item = {
                let mut source = lock(source);
                if source.has_next() {
                    source.pop_next()
                } else {
                    report.exhausted = source.is_exhausted();
                    None
                }
            };
            let Some(item) = item else {
                break;
            };
            report.items += 1;
            refill(source);

            match item.fetch_body() {
                Ok(body) if body.is_empty() => {
                    if lock(source).is_exhausted() {
                        report.exhausted = true;
                        break;
                    }
                }
                Ok(body) => {
                    let lines = TypingSession::layout(&config, width, &body);
                    report.lines += lock(session).append_lines(lines);
                }
                Err(error) => {
                    tracing::warn!(title = item.title(), %error, "Skipping sample");
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(?report, "Supply cycle finished");
        report
    }

    /// Start supplying `session` from `source` every `interval`
    ///
    /// The first cycle runs right away.
    pub fn spawn(
        session: SharedSession,
        source: SharedSource,
        interval: Duration,
    ) -> io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("sample-supplier".into())
            .spawn(move || {
                loop {
                    Self::supply(&session, &source);
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("Sample supplier stopped");
            })?;

        Ok(Self { _stop: stop })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use super::*;
    use crate::source::tests::{Broken, Text, texts};
    use crate::source::{ContentItem, OnPop, ResourceQueue};
    use crate::{Configuration, TypingSession, ViewportGeometry};

    fn shared_session() -> SharedSession {
        let geometry = ViewportGeometry::new(8, 20).unwrap();
        Arc::new(Mutex::new(TypingSession::new(geometry, Configuration::default())))
    }

    fn shared_queue(items: Vec<Box<dyn ContentItem>>) -> SharedSource {
        Arc::new(Mutex::new(ResourceQueue::new(items, OnPop::Remove)))
    }

    #[test]
    fn test_cycle_fills_to_low_water_mark() {
        let session = shared_session();
        let source = shared_queue(texts(&["one", "two", "three", "four", "five", "six", "seven"]));

        let report = SampleSupplier::supply(&session, &source);
        let session = lock(&session);
        assert!(!session.is_almost_over());
        assert!(report.items < 7);
        assert!(!report.exhausted);
        assert_eq!(report.skipped, 0);
        assert_eq!(session.buffered_lines(), 3 + report.lines);
    }

    #[test]
    fn test_cycle_grows_buffer_or_empties_source() {
        let session = shared_session();
        let source = shared_queue(texts(&["only"]));
        let before = lock(&session).buffered_lines();

        let report = SampleSupplier::supply(&session, &source);
        assert!(lock(&session).buffered_lines() > before);
        assert!(!lock(&source).has_next());
        assert!(report.exhausted);
    }

    #[test]
    fn test_full_session_is_left_alone() {
        let session = shared_session();
        lock(&session).add_sample(&"line\n".repeat(20));
        let source = shared_queue(texts(&["unused"]));

        let report = SampleSupplier::supply(&session, &source);
        assert_eq!(report, SupplyReport::default());
        assert!(lock(&source).has_next());
    }

    #[test]
    fn test_failed_fetch_is_skipped() {
        let session = shared_session();
        let items: Vec<Box<dyn ContentItem>> = vec![Box::new(Broken), Box::new(Text("ok".into()))];
        let source = shared_queue(items);

        let report = SampleSupplier::supply(&session, &source);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.lines, 1);
    }

    #[test]
    fn test_spawned_supplier_runs_first_cycle() {
        let session = shared_session();
        let source = shared_queue(texts(&["alpha", "beta"]));

        let supplier =
            SampleSupplier::spawn(session.clone(), source.clone(), Duration::from_secs(60))
                .unwrap();

        // Three seeded lines, two samples and the empty line between them
        let deadline = Instant::now() + Duration::from_secs(5);
        while lock(&session).buffered_lines() < 6 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        drop(supplier);

        assert_eq!(lock(&session).buffered_lines(), 6);
        assert!(!lock(&source).has_next());
    }

    #[test]
    fn test_layout_runs_without_the_session_lock() {
        let body = "lorem ipsum dolor sit amet, \u{201c}consectetur\u{201d} adipiscing elit\n"
            .repeat(50_000);

        let started = Instant::now();
        let lines = TypingSession::layout(&Configuration::default(), 20, &body);
        let layout_time = started.elapsed();
        assert!(lines.len() > 50_000);

        let session = shared_session();
        let source = shared_queue(vec![Box::new(Text(body))]);
        let worker = {
            let (session, source) = (session.clone(), source.clone());
            thread::spawn(move || SampleSupplier::supply(&session, &source))
        };

        let mut worst = Duration::ZERO;
        while !worker.is_finished() {
            let waiting = Instant::now();
            drop(lock(&session));
            worst = worst.max(waiting.elapsed());
            thread::sleep(Duration::from_millis(1));
        }

        let report = worker.join().unwrap();
        assert_eq!(report.lines, lines.len());
        assert!(
            worst < layout_time / 2,
            "waited {worst:?} on a layout taking {layout_time:?}"
        );
    }
}
