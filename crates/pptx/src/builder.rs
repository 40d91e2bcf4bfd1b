//! Lyrics-to-deck conversion.

use crate::package::DeckPackage;
use crate::slide::render_slide;
use lyrics_core::layout::{paginate, slide_count};
use lyrics_core::naming::{resolve_filename, title_from_name};
use lyrics_core::normalize::strip_control_chars;
use lyrics_core::{
    DeckResult, FontPreferences, FontResolver, LineNormalizer, Result, SlideGroup, StyleConfig,
};

/// Builds PPTX decks from lyrics text.
///
/// A builder holds only immutable configuration and can be shared between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    normalizer: LineNormalizer,
    style: StyleConfig,
}

impl DeckBuilder {
    /// Create a builder with the default style profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given style.
    pub fn with_style(style: StyleConfig) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Use a custom line normalizer.
    pub fn with_normalizer(mut self, normalizer: LineNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The base style; per-call font sizes are applied on top of it.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Normalize and paginate lyrics without rendering anything.
    pub fn plan(&self, lyrics_text: &str) -> Vec<SlideGroup> {
        paginate(&self.normalizer.normalize_to_lines(lyrics_text))
    }

    /// Build a deck.
    ///
    /// The caller is responsible for rejecting lyrics with no usable text
    /// (see [`lyrics_core::LyricsDocument`]); blank input yields a deck with
    /// no slides.
    pub fn build(
        &self,
        lyrics_text: &str,
        presentation_name: &str,
        font_preferences: &FontPreferences,
        font_size: Option<u32>,
    ) -> Result<DeckResult> {
        let presentation_name = strip_control_chars(presentation_name);
        let style = self.style.with_font_size(font_size);
        let fonts = FontResolver::new(font_preferences.clone());

        let lines = self.normalizer.normalize_to_lines(lyrics_text);
        let groups = paginate(&lines);

        let mut package = DeckPackage::new(title_from_name(&presentation_name), &style);
        for group in &groups {
            package.add_slide(render_slide(group, &style, &fonts)?);
        }
        let bytes = package.to_bytes()?;

        let result = DeckResult {
            bytes,
            slide_count: slide_count(lines.len()),
            filename: resolve_filename(&presentation_name),
        };

        log::debug!(
            "Built '{}': {} lines on {} slides at {}pt ({} bytes)",
            result.filename,
            lines.len(),
            result.slide_count,
            style.font_size_pt,
            result.bytes.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::DeckReader;
    use lyrics_core::{ScriptCategory, StyleProfile};
    use std::io::Cursor;

    fn build(text: &str) -> DeckResult {
        DeckBuilder::new()
            .build(text, "Song", &FontPreferences::new(), None)
            .unwrap()
    }

    #[test]
    fn test_three_lines_make_two_slides() {
        let result = build("Line1\nLine2\nLine3");
        assert_eq!(result.slide_count, 2);
        assert_eq!(result.filename, "Song.pptx");

        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(
            outline.slide_texts(),
            vec![vec!["Line1", "Line2"], vec!["Line3"]]
        );
        assert_eq!(outline.title.as_deref(), Some("Song"));
    }

    #[test]
    fn test_single_line_makes_one_slide() {
        let result = build("Amazing grace");
        assert_eq!(result.slide_count, 1);

        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(outline.slides.len(), 1);
        assert_eq!(outline.slides[0].paragraphs.len(), 1);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let result = build("\u{feff}One\n\n  \nTwo\r\n\r\nThree\n");
        assert_eq!(result.slide_count, 2);

        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(outline.slide_texts(), vec![vec!["One", "Two"], vec!["Three"]]);
    }

    #[test]
    fn test_slide_count_matches_slides_written() {
        for n in 1..8 {
            let text: Vec<String> = (1..=n).map(|i| format!("Line {}", i)).collect();
            let result = build(&text.join("\n"));
            let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();

            assert_eq!(result.slide_count, (n + 1) / 2);
            assert_eq!(outline.slides.len(), result.slide_count);
        }
    }

    #[test]
    fn test_styling_is_written() {
        let result = build("Line1\nLine2");
        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();

        assert_eq!(outline.slide_width, Some(12_188_952));
        assert_eq!(outline.slide_height, Some(6_858_000));

        let slide = &outline.slides[0];
        assert_eq!(slide.background.as_deref(), Some("000000"));

        for p in &slide.paragraphs {
            assert_eq!(p.alignment.as_deref(), Some("ctr"));
            assert_eq!(p.color.as_deref(), Some("FFFFFF"));
            assert_eq!(p.size, Some(3600));
            assert!(p.bold);
        }
        assert_eq!(slide.paragraphs[0].space_before, None);
        assert_eq!(slide.paragraphs[1].space_before, Some(1200));
    }

    #[test]
    fn test_fonts_follow_script() {
        let result = build("Hallelujah\nनमस्ते\nనమస్తే");
        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();

        let first = &outline.slides[0].paragraphs;
        assert_eq!(first[0].typeface.as_deref(), Some("Calibri"));
        assert_eq!(first[0].language.as_deref(), Some("en-US"));
        assert_eq!(first[1].typeface.as_deref(), Some("Noto Sans Devanagari Bold"));
        assert_eq!(first[1].language.as_deref(), Some("hi-IN"));

        let second = &outline.slides[1].paragraphs;
        assert_eq!(second[0].typeface.as_deref(), Some("Noto Sans Telugu Bold"));
    }

    #[test]
    fn test_hindi_override() {
        let preferences = FontPreferences::new().with_font(ScriptCategory::Hindi, "Mangal");
        let result = DeckBuilder::new()
            .build("नमस्ते", "Song", &preferences, None)
            .unwrap();
        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();

        assert_eq!(
            outline.slides[0].paragraphs[0].typeface.as_deref(),
            Some("Mangal")
        );
    }

    #[test]
    fn test_font_size_override_and_profile_default() {
        let builder = DeckBuilder::with_style(StyleConfig::for_profile(StyleProfile::Stage));

        let result = builder
            .build("Line", "Song", &FontPreferences::new(), None)
            .unwrap();
        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(outline.slides[0].paragraphs[0].size, Some(4800));

        let result = builder
            .build("Line", "Song", &FontPreferences::new(), Some(60))
            .unwrap();
        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(outline.slides[0].paragraphs[0].size, Some(6000));
    }

    #[test]
    fn test_filename_resolution() {
        let builder = DeckBuilder::new();
        let prefs = FontPreferences::new();

        let name = |n: &str| builder.build("Line", n, &prefs, None).unwrap().filename;
        assert_eq!(name("Song"), "Song.pptx");
        assert_eq!(name("Song.pptx"), "Song.pptx");
        assert_eq!(name("SONG.PPTX"), "SONG.PPTX");
        assert_eq!(name("  "), "Lyrics.pptx");
    }

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut file, &mut content).unwrap();
        content
    }

    fn illegal_xml_chars(xml: &str) -> Vec<u32> {
        xml.chars()
            .filter(|&c| c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
            .map(|c| c as u32)
            .collect()
    }

    #[test]
    fn test_control_characters_never_reach_xml() {
        let result = DeckBuilder::new()
            .build(
                "Verse one\u{000b}continued\nBell\u{0007}",
                "Song\u{0001}",
                &FontPreferences::new(),
                None,
            )
            .unwrap();

        let slide = read_part(&result.bytes, "ppt/slides/slide1.xml");
        assert_eq!(illegal_xml_chars(&slide), Vec::<u32>::new());
        let core = read_part(&result.bytes, "docProps/core.xml");
        assert_eq!(illegal_xml_chars(&core), Vec::<u32>::new());

        let outline = DeckReader::new().read(Cursor::new(&result.bytes)).unwrap();
        assert_eq!(
            outline.slide_texts(),
            vec![vec!["Verse one continued", "Bell"]]
        );
        assert_eq!(outline.title.as_deref(), Some("Song"));
        assert_eq!(result.filename, "Song.pptx");
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = build("Line1\nLine2\nनमस्ते");
        let second = build("Line1\nLine2\nनमस्ते");

        assert_eq!(first.slide_count, second.slide_count);
        assert_eq!(first.filename, second.filename);
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_plan_matches_build() {
        let builder = DeckBuilder::new();
        let groups = builder.plan("a\nb\n\nc");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].lines, vec!["c"]);
    }
}
