use derive_more::From;
use scribe::GeometryError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sources::SourceError;

/// Minimum terminal size the game is playable in
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 8;

#[derive(Debug, Error, From)]
pub enum AppError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Source(SourceError),

    #[error("Unusable game area: {0}")]
    Geometry(GeometryError),

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("Your terminal is too small ({width}x{height}). At least 40x8 is needed")]
    #[from(skip)]
    TerminalTooSmall { width: u16, height: u16 },

    #[error("stdout is not a tty")]
    #[from(skip)]
    NotATerminal,
}
