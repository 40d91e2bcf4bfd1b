//! PPTX deck reader.
//!
//! Recovers the slide structure of a lyrics deck: slide order, background
//! color, and the text and run formatting of every paragraph.

use lyrics_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A deck as read back from a PPTX file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckOutline {
    /// Title from the core properties, if present.
    pub title: Option<String>,

    /// Slide width in EMU, if declared.
    pub slide_width: Option<i64>,

    /// Slide height in EMU, if declared.
    pub slide_height: Option<i64>,

    /// Slides in presentation order.
    pub slides: Vec<SlideOutline>,
}

impl DeckOutline {
    /// Text of every slide, one entry per slide.
    pub fn slide_texts(&self) -> Vec<Vec<&str>> {
        self.slides
            .iter()
            .map(|s| s.paragraphs.iter().map(|p| p.text.as_str()).collect())
            .collect()
    }
}

/// One slide of a deck.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlideOutline {
    /// 1-based slide number.
    pub number: usize,

    /// Solid background color as hex, if the slide sets one.
    pub background: Option<String>,

    /// Paragraphs in reading order.
    pub paragraphs: Vec<ParagraphOutline>,
}

/// One paragraph with the formatting of its first run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphOutline {
    pub text: String,
    pub alignment: Option<String>,
    pub typeface: Option<String>,
    pub language: Option<String>,
    /// Font size in hundredths of a point.
    pub size: Option<u32>,
    pub bold: bool,
    /// Text color as hex.
    pub color: Option<String>,
    /// Space before the paragraph in hundredths of a point.
    pub space_before: Option<u32>,
}

/// Reader for lyrics decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a deck from a PPTX reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckOutline> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut outline = DeckOutline {
            title: self.read_title(&mut archive),
            ..Default::default()
        };

        let presentation = self.read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        if let Some((cx, cy)) = read_slide_size(&presentation)? {
            outline.slide_width = Some(cx);
            outline.slide_height = Some(cy);
        }

        let slide_order = self.get_slide_order(&mut archive)?;
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            outline.slides.push(read_slide(&content, idx + 1)?);
        }

        log::debug!("Read {} slides", outline.slides.len());
        Ok(outline)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content =
            self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();
                    let id = attribute(e, b"Id").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order_num =
                            extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Title from `docProps/core.xml`; decks without one are still readable.
    fn read_title<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Option<String> {
        let content = self
            .read_file_from_archive(archive, "docProps/core.xml")
            .ok()?;
        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        let mut in_title = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"title" => {
                    in_title = true;
                }
                Ok(Event::Text(ref e)) if in_title => {
                    return e.unescape().ok().map(|t| t.into_owned());
                }
                Ok(Event::End(_)) => in_title = false,
                Ok(Event::Eof) => return None,
                Err(e) => {
                    log::warn!("Ignoring unreadable core properties: {}", e);
                    return None;
                }
                _ => {}
            }
        }
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `p:sldSz` from `presentation.xml`.
fn read_slide_size(xml: &str) -> Result<Option<(i64, i64)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldSz" =>
            {
                let cx = attribute(e, b"cx").and_then(|v| v.parse().ok());
                let cy = attribute(e, b"cy").and_then(|v| v.parse().ok());
                return Ok(cx.zip(cy));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::PptxParseError(format!(
                    "Invalid presentation.xml: {}",
                    e
                )))
            }
            _ => {}
        }
    }
}

/// Parser state while walking one slide.
#[derive(Default)]
struct SlideState {
    in_background: bool,
    in_run_props: bool,
    in_space_before: bool,
    in_text: bool,
    paragraph: Option<ParagraphOutline>,
}

impl SlideState {
    /// Handle an opening or self-closing element.
    fn open(&mut self, slide: &mut SlideOutline, e: &BytesStart, self_closing: bool) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"bg" if !self_closing => self.in_background = true,
            b"p" if !self_closing => {
                self.paragraph = Some(ParagraphOutline::default());
            }
            b"pPr" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.alignment = attribute(e, b"algn");
                }
            }
            b"spcBef" if !self_closing => self.in_space_before = true,
            b"spcPts" if self.in_space_before => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.space_before = attribute(e, b"val").and_then(|v| v.parse().ok());
                }
            }
            b"rPr" | b"endParaRPr" => {
                if let Some(p) = self.paragraph.as_mut() {
                    // Only the first run's formatting is recorded
                    if p.size.is_none() {
                        p.language = attribute(e, b"lang");
                        p.size = attribute(e, b"sz").and_then(|v| v.parse().ok());
                        p.bold = attribute(e, b"b").is_some_and(|b| b == "1" || b == "true");
                    }
                }
                if !self_closing {
                    self.in_run_props = true;
                }
            }
            b"latin" if self.in_run_props => {
                if let Some(p) = self.paragraph.as_mut() {
                    if p.typeface.is_none() {
                        p.typeface = attribute(e, b"typeface");
                    }
                }
            }
            b"srgbClr" => {
                let value = attribute(e, b"val");
                if self.in_run_props {
                    if let Some(p) = self.paragraph.as_mut() {
                        if p.color.is_none() {
                            p.color = value;
                        }
                    }
                } else if self.in_background && slide.background.is_none() {
                    slide.background = value;
                }
            }
            b"t" if !self_closing => self.in_text = true,
            _ => {}
        }
    }

    /// Handle a closing element.
    fn close(&mut self, slide: &mut SlideOutline, name: &[u8]) {
        match local_name(name) {
            b"bg" => self.in_background = false,
            b"spcBef" => self.in_space_before = false,
            b"rPr" | b"endParaRPr" => self.in_run_props = false,
            b"t" => self.in_text = false,
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    slide.paragraphs.push(p);
                }
            }
            _ => {}
        }
    }
}

/// Walk one slide part.
fn read_slide(xml: &str, number: usize) -> Result<SlideOutline> {
    let mut slide = SlideOutline {
        number,
        ..Default::default()
    };
    let mut state = SlideState::default();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => state.open(&mut slide, e, false),
            Ok(Event::Empty(ref e)) => state.open(&mut slide, e, true),
            Ok(Event::Text(ref e)) if state.in_text => {
                if let Some(p) = state.paragraph.as_mut() {
                    let text = e.unescape().unwrap_or_default();
                    p.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => state.close(&mut slide, e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!(
                    "Invalid slide {}: {}",
                    number, e
                )))
            }
            _ => {}
        }
    }

    Ok(slide)
}

/// Unescaped value of an attribute, if present.
fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
