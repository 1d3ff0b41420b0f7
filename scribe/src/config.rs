//! # Configuration Module - Runtime Behavior Settings
//!
//! This module provides the options that shape how sample text is laid out, how keystrokes
//! are drawn and how speed is reported. A [`Configuration`] is built once at startup and handed
//! by value to every [`TypingSession`](crate::TypingSession).
//!
//! ## Usage
//!
//! ```rust
//! use scribe::{Attr, Configuration, SpeedUnit};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.tab_width, 2);
//!
//! // Custom configuration
//! let config = Configuration {
//!     morphing: true,
//!     speed_unit: SpeedUnit::Cps,
//!     error_attr: Attr::Underline,
//!     ..Configuration::default()
//! };
//! ```

use crate::canvas::Attr;
use crate::wrap::WrapOptions;

/// Unit used when reporting typing speed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Words per minute, counting five characters as one word
    #[default]
    Wpm,
    /// Characters per second
    Cps,
}

/// Runtime configuration for a typing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Number of spaces a tab expands to, both in samples and in typed input
    ///
    /// **Default**: 2
    pub tab_width: usize,

    /// Keep empty lines of the sample text instead of collapsing paragraph gaps
    ///
    /// **Default**: true
    pub keep_empty_lines: bool,

    /// Collapse runs of spaces into one and drop indentation
    ///
    /// **Default**: false
    pub collapse_spaces: bool,

    /// Put an empty line between consecutive samples (only when empty lines are kept)
    ///
    /// **Default**: true
    pub separate_samples: bool,

    /// Preview the next line on the active row as the input grows
    ///
    /// **Default**: false
    pub morphing: bool,

    /// Unit reported by [`TypingSession::get_speed`](crate::TypingSession::get_speed)
    ///
    /// **Default**: [`SpeedUnit::Wpm`]
    pub speed_unit: SpeedUnit,

    /// Attribute used for wrongly typed characters
    ///
    /// **Default**: [`Attr::Reverse`]
    pub error_attr: Attr,

    /// Character the two separator rows are drawn with
    ///
    /// **Default**: `'-'`
    pub separator: char,
}

impl Configuration {
    /// Wrapping options derived from this configuration
    pub const fn wrap_options(&self) -> WrapOptions {
        WrapOptions {
            tab_width: self.tab_width,
            keep_empty_lines: self.keep_empty_lines,
            collapse_spaces: self.collapse_spaces,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tab_width: 2,
            keep_empty_lines: true,
            collapse_spaces: false,
            separate_samples: true,
            morphing: false,
            speed_unit: SpeedUnit::Wpm,
            error_attr: Attr::Reverse,
            separator: '-',
        }
    }
}
