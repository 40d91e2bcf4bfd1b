//! Line normalization for pasted lyrics.
//!
//! Splits text on every newline convention, trims each line, puts it in
//! Unicode NFC form and drops blank lines so that pagination only ever sees
//! lines that will be shown.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of spaces and tabs into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00a0}]+").unwrap());

/// Byte-order mark, stripped wherever it appears in a line.
const BOM: char = '\u{feff}';

/// Vertical tab, used as a soft line break in text copied from Office.
const SOFT_BREAK: char = '\u{000b}';

/// Make text safe for XML 1.0 character data.
///
/// Soft line breaks become spaces; byte-order marks, non-characters and
/// control characters other than tab are removed.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            SOFT_BREAK => Some(' '),
            '\t' => Some(c),
            BOM | '\u{fffe}' | '\u{ffff}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Line normalizer for lyrics text.
#[derive(Debug, Clone, Default)]
pub struct LineNormalizer {
    /// Whether to collapse interior whitespace runs to a single space.
    collapse_whitespace: bool,
}

impl LineNormalizer {
    /// Create a normalizer that only trims lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether interior runs of spaces and tabs become one space.
    pub fn with_collapse_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }

    /// Normalize a single line.
    ///
    /// - Removes byte-order marks and control characters, turning soft
    ///   line breaks into spaces
    /// - Trims leading/trailing whitespace
    /// - Composes to NFC so that pasted Devanagari and Telugu compare equal
    ///   regardless of the source editor
    pub fn normalize_line(&self, line: &str) -> String {
        let cleaned = strip_control_chars(line);
        let composed: String = cleaned.trim().nfc().collect();

        if self.collapse_whitespace {
            WHITESPACE_COLLAPSE_REGEX
                .replace_all(&composed, " ")
                .into_owned()
        } else {
            composed
        }
    }

    /// Normalize lyrics text into the lines that will be paginated.
    ///
    /// Blank lines are dropped.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");

        let lines: Vec<String> = unified
            .split('\n')
            .map(|l| self.normalize_line(l))
            .filter(|l| !l.is_empty())
            .collect();

        log::debug!("Normalized lyrics into {} lines", lines.len());
        lines
    }
}
