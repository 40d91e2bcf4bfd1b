//! Domain types for a single lyrics-to-deck conversion.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Byte-order mark that shows up at the boundaries of pasted text.
const BOM: char = '\u{feff}';

/// Raw lyrics text that is known to contain something worth rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsDocument {
    text: String,
}

impl LyricsDocument {
    /// Validate pasted lyrics text.
    ///
    /// Strips boundary byte-order marks and rejects text that is empty or
    /// only whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let stripped = text.trim_matches(BOM);

        if stripped.trim().is_empty() {
            return Err(Error::EmptyLyrics);
        }

        Ok(Self {
            text: stripped.to_string(),
        })
    }

    /// The validated text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Writing system used to choose a font for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptCategory {
    /// Latin script, and anything not matched by another category.
    English,
    /// Devanagari script.
    Hindi,
    /// Telugu script.
    Telugu,
}

impl ScriptCategory {
    /// All categories, in detection priority order.
    pub const ALL: [ScriptCategory; 3] = [Self::Hindi, Self::Telugu, Self::English];

    /// Lowercase key used in forms and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
            Self::Telugu => "telugu",
        }
    }

    /// BCP 47 language tag written on text runs of this category.
    pub fn language_tag(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Hindi => "hi-IN",
            Self::Telugu => "te-IN",
        }
    }
}

impl fmt::Display for ScriptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ScriptCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(Self::English),
            "hindi" => Ok(Self::Hindi),
            "telugu" => Ok(Self::Telugu),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// The lines rendered together on one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideGroup {
    /// 1-based slide number.
    pub number: usize,

    /// One or two lines, in input order.
    pub lines: Vec<String>,
}

impl SlideGroup {
    /// Create a group for the given slide number.
    pub fn new(number: usize, lines: Vec<String>) -> Self {
        Self { number, lines }
    }
}

impl fmt::Display for SlideGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Output of one conversion.
#[derive(Debug, Clone)]
pub struct DeckResult {
    /// The serialized presentation.
    pub bytes: Vec<u8>,

    /// Number of slides in the deck.
    pub slide_count: usize,

    /// Suggested download filename, always ending in `.pptx`.
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_strips_bom() {
        let doc = LyricsDocument::new("\u{feff}Amazing grace\u{feff}").unwrap();
        assert_eq!(doc.as_str(), "Amazing grace");
    }

    #[test]
    fn test_document_rejects_blank_text() {
        assert!(matches!(LyricsDocument::new(""), Err(Error::EmptyLyrics)));
        assert!(matches!(
            LyricsDocument::new("  \n\t\n "),
            Err(Error::EmptyLyrics)
        ));
        assert!(matches!(
            LyricsDocument::new("\u{feff}"),
            Err(Error::EmptyLyrics)
        ));
    }

    #[test]
    fn test_category_round_trips_through_key() {
        for category in ScriptCategory::ALL {
            assert_eq!(category.key().parse::<ScriptCategory>().unwrap(), category);
        }
        assert_eq!(
            " Hindi ".parse::<ScriptCategory>().unwrap(),
            ScriptCategory::Hindi
        );
        assert!("tamil".parse::<ScriptCategory>().is_err());
    }

    #[test]
    fn test_slide_group_display() {
        let group = SlideGroup::new(1, vec!["Line A".to_string(), "Line B".to_string()]);
        assert_eq!(group.to_string(), "Line A\nLine B");
        assert_eq!(group.lines.len(), 2);
    }
}
