//! # Wrap Module - Turning prose into display lines
//!
//! [`wrap`] lays out normalized text as a sequence of lines no wider than the viewport. The
//! layout keeps paragraph structure (newlines always break), prefers breaking at the last space
//! that fits, and hard-cuts words that are wider than the viewport.
//!
//! ## Algorithm
//!
//! 1. Tabs are expanded and `\r\n` becomes `\n`.
//! 2. Trailing whitespace of the whole text, spaces before each newline and leading newlines
//!    are stripped.
//! 3. Without `keep_empty_lines`, runs of newlines collapse to one.
//! 4. With `collapse_spaces`, runs of spaces collapse to one and the space after a newline is
//!    dropped. The first line keeps its indentation.
//! 5. The text is consumed front to back: a newline at or before column `width` cuts the line
//!    there; a remainder shorter than `width` is emitted whole; otherwise the line is cut at the
//!    last space at or before column `width`, or hard-cut at `width` when there is none.
//!
//! The break character is never part of either resulting line, so a word that exactly fills
//! the width is followed by the next word, not by an empty line.
//!
//! ```rust
//! use scribe::{WrapOptions, wrap};
//!
//! let lines = wrap("the quick brown fox", 10, &WrapOptions::default());
//! assert_eq!(lines, vec!["the quick", "brown fox"]);
//! ```

/// Options controlling how text is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOptions {
    /// Number of spaces a tab expands to
    pub tab_width: usize,
    /// Keep empty lines (paragraph gaps). An empty text then still yields one empty line.
    pub keep_empty_lines: bool,
    /// Collapse runs of spaces and strip indentation
    pub collapse_spaces: bool,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            tab_width: 2,
            keep_empty_lines: true,
            collapse_spaces: false,
        }
    }
}

/// Wrap `text` into lines of at most `width` characters
///
/// Total for any input; a `width` of zero is treated as one.
pub fn wrap(text: &str, width: usize, options: &WrapOptions) -> Vec<String> {
    let width = width.max(1);
    let prepared = prepare(text, options);
    let chars = prepared.chars().collect::<Vec<char>>();

    let mut lines = Vec::new();
    let mut rest = chars.as_slice();

    while !rest.is_empty() {
        // Column `width` itself may hold the break
        let window = &rest[..(width + 1).min(rest.len())];

        if let Some(index) = window.iter().position(|&c| c == '\n') {
            lines.push(window[..index].iter().collect());
            rest = &rest[index + 1..];
        } else if rest.len() < width {
            lines.push(rest.iter().collect());
            break;
        } else if let Some(index) = window.iter().rposition(|&c| c == ' ') {
            lines.push(window[..index].iter().collect());
            rest = &rest[index + 1..];
        } else {
            lines.push(rest[..width].iter().collect());
            rest = &rest[width..];
        }
    }

    if lines.is_empty() && options.keep_empty_lines {
        lines.push(String::new());
    }

    lines
}

/// Steps 1 to 4: whitespace clean-up before layout
fn prepare(text: &str, options: &WrapOptions) -> String {
    let expanded = text
        .replace("\r\n", "\n")
        .replace('\t', &" ".repeat(options.tab_width));

    let stripped = expanded
        .trim_end_matches([' ', '\n'])
        .split('\n')
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n");
    let mut prepared = stripped.trim_start_matches('\n').to_string();

    if !options.keep_empty_lines {
        prepared = collapse_runs(&prepared, '\n');
    }

    if options.collapse_spaces {
        prepared = collapse_runs(&prepared, ' ').replace("\n ", "\n");
    }

    prepared
}

/// Replaces every run of `target` with a single occurrence
fn collapse_runs(text: &str, target: char) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut previous = None;

    for character in text.chars() {
        if character == target && previous == Some(target) {
            continue;
        }
        collapsed.push(character);
        previous = Some(character);
    }

    collapsed
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn options(keep_empty_lines: bool, collapse_spaces: bool) -> WrapOptions {
        WrapOptions {
            tab_width: 2,
            keep_empty_lines,
            collapse_spaces,
        }
    }

    #[test]
    fn test_word_wrap() {
        let lines = wrap("the quick brown fox jumps", 10, &WrapOptions::default());
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_remainder_of_exact_width_still_breaks_at_space() {
        // "ab cd" fills 5 columns exactly; the line is broken instead of ending at the edge
        let lines = wrap("ab cd", 5, &WrapOptions::default());
        assert_eq!(lines, vec!["ab", "cd"]);

        let lines = wrap("ab cd", 6, &WrapOptions::default());
        assert_eq!(lines, vec!["ab cd"]);
    }

    #[test]
    fn test_break_right_after_a_full_word() {
        assert_eq!(
            wrap("abcd efgh", 4, &options(false, false)),
            vec!["abcd", "efgh"]
        );
        assert_eq!(
            wrap("abcd\nefgh", 4, &options(false, false)),
            vec!["abcd", "efgh"]
        );
        assert_eq!(
            wrap("abcd\n\nefgh", 4, &options(true, false)),
            vec!["abcd", "", "efgh"]
        );
    }

    #[test]
    fn test_hard_cut_of_unbreakable_runs() {
        let lines = wrap("abcdefgh", 3, &WrapOptions::default());
        assert_eq!(lines, vec!["abc", "def", "gh"]);

        let lines = wrap("abcdef", 3, &WrapOptions::default());
        assert_eq!(lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_newlines_always_break() {
        let lines = wrap("one\ntwo three", 40, &WrapOptions::default());
        assert_eq!(lines, vec!["one", "two three"]);
    }

    #[test]
    fn test_empty_lines_policy() {
        let text = "one\n\n\ntwo";
        assert_eq!(wrap(text, 40, &options(true, false)), vec!["one", "", "", "two"]);
        assert_eq!(wrap(text, 40, &options(false, false)), vec!["one", "two"]);
    }

    #[test]
    fn test_whitespace_stripping() {
        let text = "\n\n  first   \nsecond  \n \n\n";
        assert_eq!(
            wrap(text, 40, &WrapOptions::default()),
            vec!["  first", "second"]
        );
    }

    #[test]
    fn test_collapse_spaces() {
        let text = "lots   of    space\n    indented";
        assert_eq!(
            wrap(text, 40, &options(true, true)),
            vec!["lots of space", "indented"]
        );

        // Only spaces after a newline go, the first line keeps one
        assert_eq!(
            wrap("   first\n   second", 40, &options(true, true)),
            vec![" first", "second"]
        );
    }

    #[test]
    fn test_tabs_and_crlf() {
        let text = "a\tb\r\nc";
        assert_eq!(wrap(text, 40, &WrapOptions::default()), vec!["a  b", "c"]);

        let wide_tabs = WrapOptions {
            tab_width: 4,
            ..WrapOptions::default()
        };
        assert_eq!(wrap("\tx", 40, &wide_tabs), vec!["    x"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(wrap("", 10, &options(true, false)), vec![""]);
        assert_eq!(wrap(" \n \n", 10, &options(true, false)), vec![""]);
        assert!(wrap("", 10, &options(false, false)).is_empty());
    }

    #[test]
    fn test_zero_width_is_treated_as_one() {
        assert_eq!(wrap("ab", 0, &WrapOptions::default()), vec!["a", "b"]);
    }

    #[test]
    fn test_leading_space_at_break_point() {
        // The only space in the window is at column 0
        let lines = wrap(" abcdef", 4, &WrapOptions::default());
        assert_eq!(lines, vec!["", "abcd", "ef"]);
    }

    proptest! {
        #[test]
        fn wrapped_lines_never_exceed_width(
            s in "[a-zA-Z \n\t]{0,200}",
            width in 1usize..60,
            keep in any::<bool>(),
            collapse in any::<bool>(),
        ) {
            for line in wrap(&s, width, &options(keep, collapse)) {
                prop_assert!(line.chars().count() <= width, "Line '{}' exceeds width {}", line, width);
            }
        }

        #[test]
        fn wrapped_content_preserved(
            s in "[a-zA-Z .,\n\t]{0,200}",
            width in 1usize..60,
            keep in any::<bool>(),
            collapse in any::<bool>(),
        ) {
            let lines = wrap(&s, width, &options(keep, collapse));
            let rejoined: String = lines.join(" ");
            let visible = |text: &str| text.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            prop_assert_eq!(visible(&s), visible(&rejoined));
        }
    }
}
