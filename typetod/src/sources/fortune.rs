use std::path::PathBuf;
use std::process::{Command, Stdio};

use scribe::{ContentItem, FetchError, Generator, OnPop, ResourceQueue};

use super::SourceError;

/// How many fortunes are kept ready for the menu
pub const FORTUNE_COUNT: usize = 24;

const FORTUNE_TOOL: &str = "fortune";

/// One generated fortune, already in memory
#[derive(Debug, Clone)]
pub struct Fortune {
    title: String,
    text: String,
}

impl Fortune {
    /// The title is the first line, with tabs expanded so it fits the menu
    pub fn new(text: String, tab_width: usize) -> Self {
        let first_line = text.lines().next().unwrap_or_default();
        let title = first_line.replace('\t', &" ".repeat(tab_width));
        Self { title, text }
    }
}

impl ContentItem for Fortune {
    fn title(&self) -> &str {
        &self.title
    }

    fn fetch_body(&self) -> Result<String, FetchError> {
        Ok(self.text.clone())
    }
}

/// Runs the `fortune` program once per item
#[derive(Debug)]
pub struct FortuneGenerator {
    program: PathBuf,
    tab_width: usize,
}

impl FortuneGenerator {
    pub fn new(program: PathBuf, tab_width: usize) -> Self {
        Self { program, tab_width }
    }

    fn command_error(&self, error: impl ToString) -> FetchError {
        FetchError::Command {
            program: self.program.display().to_string(),
            error: error.to_string(),
        }
    }
}

impl Generator for FortuneGenerator {
    fn generate(&mut self) -> Result<Box<dyn ContentItem>, FetchError> {
        let output = Command::new(&self.program)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|error| self.command_error(error))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.command_error(format!(
                "bad exit code: {}\nStderr: {stderr}",
                output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(Box::new(Fortune::new(text, self.tab_width)))
    }
}

/// A queue of fortunes that refills itself as items are taken
pub fn queue(tab_width: usize) -> Result<ResourceQueue, SourceError> {
    let program = which::which(FORTUNE_TOOL).map_err(|error| SourceError::ToolMissing {
        tool: FORTUNE_TOOL.to_string(),
        error,
    })?;

    let mut generator = FortuneGenerator::new(program, tab_width);
    let items = (0..FORTUNE_COUNT)
        .map(|_| generator.generate())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResourceQueue::new(items, OnPop::replace(generator)))
}
