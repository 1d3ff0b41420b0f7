mod app;
mod config;
mod error;
mod logging;
mod page;
mod screen;
mod sources;
mod utils;

use std::io::{stdin, stdout};
use std::process::ExitCode;

use clap::Parser;
use crossterm::cursor::SetCursorStyle;
use crossterm::execute;
use crossterm::tty::IsTty;
use ratatui::DefaultTerminal;

use crate::app::{App, Context, Ending};
use crate::config::{Cli, Settings, SourceKind};
use crate::error::{AppError, MIN_HEIGHT, MIN_WIDTH};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = logging::init();
    logging::install_panic_hook();

    match run(&cli) {
        Ok(Ending::Finished) => ExitCode::SUCCESS,
        Ok(Ending::Interrupted) => {
            eprintln!("stopped");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "Exiting with an error");
            eprintln!("ERROR: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Ending, AppError> {
    if !stdout().is_tty() {
        return Err(AppError::NotATerminal);
    }
    let piped = !stdin().is_tty();

    let settings = Settings::get(cli, piped)?;
    tracing::debug!(?settings, piped, "Settings loaded");

    if settings.source == SourceKind::Feed {
        println!("downloading the rss feed from the url...");
    }
    let source = sources::resolve(&settings, &cli.args)?;
    let context = Context::new(settings, source, app::user_name());

    let mut guard = TerminalGuard::new()?;
    let size = guard.terminal.size()?;
    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        return Err(AppError::TerminalTooSmall {
            width: size.width,
            height: size.height,
        });
    }

    App::new(context).run(&mut guard.terminal)
}

/// Raw mode and the alternate screen, undone on drop whatever the exit path
struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    fn new() -> std::io::Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(error) = execute!(stdout(), SetCursorStyle::DefaultUserShape) {
            tracing::warn!(%error, "Could not reset the cursor style");
        }
        ratatui::restore();
    }
}
