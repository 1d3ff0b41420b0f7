use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use scribe::{ContentItem, ContentSource, FetchError, lock};

type SharedReader = Arc<Mutex<dyn BufRead + Send>>;

/// Lines of a pipe, one sample per line
///
/// Never runs dry until the pipe closes. The reader is only touched when a line is fetched, so
/// a slow producer blocks the supplier thread and nothing else.
pub struct PipedSource {
    reader: SharedReader,
    exhausted: Arc<AtomicBool>,
}

impl PipedSource {
    pub fn new(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(reader)),
            exhausted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl ContentSource for PipedSource {
    fn has_next(&self) -> bool {
        !self.exhausted.load(Ordering::Acquire)
    }

    fn pop_next(&mut self) -> Option<Box<dyn ContentItem>> {
        self.has_next().then(|| {
            Box::new(PipedLine {
                reader: Arc::clone(&self.reader),
                exhausted: Arc::clone(&self.exhausted),
            }) as Box<dyn ContentItem>
        })
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }
}

/// The next line of the pipe, whichever it is when fetched
struct PipedLine {
    reader: SharedReader,
    exhausted: Arc<AtomicBool>,
}

impl ContentItem for PipedLine {
    fn title(&self) -> &str {
        "stdin"
    }

    /// An empty body means the pipe is closed
    fn fetch_body(&self) -> Result<String, FetchError> {
        let mut bytes = Vec::new();
        let read = lock(&self.reader).read_until(b'\n', &mut bytes)?;

        if read == 0 {
            tracing::debug!("Input pipe closed");
            self.exhausted.store(true, Ordering::Release);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
