//! # Normalize Module - Mapping prose onto a typeable alphabet
//!
//! Sample text comes from arbitrary sources, but players type on a plain keyboard. Every sample
//! is passed through [`normalize`] before wrapping: common accented letters, typographic
//! punctuation and full-width forms are folded to ASCII, and whatever is left over is replaced
//! by a visible escape sequence. The output is always pure ASCII, so one `char` is one cell.
//!
//! ```rust
//! use scribe::normalize;
//!
//! assert_eq!(normalize("“Café” – naïve…"), "\"Cafe\" - na\\xefve...");
//! ```

use std::fmt::Write;

/// Folds a single code point to its ASCII replacement, if the table has one
const fn substitute(character: char) -> Option<&'static str> {
    let replacement = match character {
        '\u{a0}' => " ",
        '\u{a3}' => "E",
        '\u{e0}'..='\u{e5}' => "a",
        '\u{e6}' => "ae",
        '\u{e7}' => "c",
        '\u{e8}'..='\u{eb}' => "e",
        '\u{2010}' | '\u{2013}' => "-",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201c}' | '\u{201d}' => "\"",
        '\u{2026}' => "...",
        '\u{2028}' | '\u{2029}' => "\n",
        '\u{20ac}' => "C",
        '\u{3000}' => " ",
        '\u{301c}' => "~",
        '\u{ff01}' => "!",
        '\u{ff03}' => "#",
        '\u{ff04}' => "$",
        '\u{ff05}' => "%",
        '\u{ff06}' => "&",
        '\u{ff08}' => "(",
        '\u{ff09}' => ")",
        '\u{ff0a}' => "*",
        '\u{ff0b}' => "+",
        '\u{ff0c}' => ",",
        '\u{ff0d}' => "-",
        '\u{ff0e}' => ".",
        '\u{ff0f}' => "/",
        '\u{ff1a}' => ":",
        '\u{ff1b}' => ";",
        '\u{ff1c}' => "<",
        '\u{ff1d}' => "=",
        '\u{ff1e}' => ">",
        '\u{ff1f}' => "?",
        '\u{ff20}' => "@",
        '\u{ff3b}' => "[",
        '\u{ff3c}' => "\\",
        '\u{ff3d}' => "]",
        '\u{ff3e}' => "^",
        '\u{ff40}' => "`",
        '\u{ff5b}' => "{",
        '\u{ff5c}' => "|",
        '\u{ff5d}' => "}",
        _ => return None,
    };
    Some(replacement)
}

/// Normalize arbitrary text to ASCII
///
/// Never fails. Code points without a table entry are written as `\xNN`, `\uNNNN` or
/// `\UNNNNNNNN` escapes, so no input character is silently dropped.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());

    for character in text.chars() {
        if character.is_ascii() {
            normalized.push(character);
        } else if let Some(replacement) = substitute(character) {
            normalized.push_str(replacement);
        } else {
            escape(character, &mut normalized);
        }
    }

    normalized
}

fn escape(character: char, out: &mut String) {
    let code = u32::from(character);
    // Writing into a String cannot fail
    let _ = if code <= 0xff {
        write!(out, "\\x{code:02x}")
    } else if code <= 0xffff {
        write!(out, "\\u{code:04x}")
    } else {
        write!(out, "\\U{code:08x}")
    };
}
