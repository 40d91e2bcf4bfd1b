//! OPC package assembly for a lyrics deck.
//!
//! A deck is one slide master, one blank layout and one theme shared by
//! every slide. Fixed parts are bundled from `resources/`; parts that depend
//! on the slide count or title are generated.

use crate::xml::{XmlBuilder, NS_A, NS_P, NS_PACKAGE_RELS, NS_R};
use lyrics_core::{Error, Result, StyleConfig};
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const THEME_XML: &str = include_str!("../resources/theme1.xml");
const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMaster1.xml");
const SLIDE_MASTER_RELS_XML: &str = include_str!("../resources/slideMaster1.xml.rels");
const SLIDE_LAYOUT_XML: &str = include_str!("../resources/slideLayout1.xml");
const SLIDE_LAYOUT_RELS_XML: &str = include_str!("../resources/slideLayout1.xml.rels");
const PRES_PROPS_XML: &str = include_str!("../resources/presProps.xml");
const VIEW_PROPS_XML: &str = include_str!("../resources/viewProps.xml");
const TABLE_STYLES_XML: &str = include_str!("../resources/tableStyles.xml");

/// MIME type of a `.pptx` file.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Part content types.
mod content_types {
    pub const RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// Relationship types.
mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const APP_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Relationship ids in `presentation.xml.rels` below this are taken by
/// the fixed parts; slide N uses `rId{SLIDE_REL_OFFSET + N}`.
const SLIDE_REL_OFFSET: usize = 5;

/// First slide id; PowerPoint requires ids of 256 and up.
const FIRST_SLIDE_ID: usize = 256;

/// Notes page size (portrait letter), in EMU.
const NOTES_WIDTH: i64 = 6_858_000;
const NOTES_HEIGHT: i64 = 9_144_000;

/// Name written as the producing application.
const APPLICATION: &str = "lyrics-deck";

fn slide_rel_id(number: usize) -> String {
    format!("rId{}", SLIDE_REL_OFFSET + number)
}

/// An in-memory presentation package.
#[derive(Debug, Clone)]
pub struct DeckPackage {
    title: String,
    slide_width: i64,
    slide_height: i64,
    slides: Vec<String>,
}

impl DeckPackage {
    /// Create an empty package sized by `style`.
    pub fn new(title: impl Into<String>, style: &StyleConfig) -> Self {
        Self {
            title: title.into(),
            slide_width: style.slide_width,
            slide_height: style.slide_height,
            slides: Vec::new(),
        }
    }

    /// Append a rendered slide part.
    pub fn add_slide(&mut self, slide_xml: String) {
        self.slides.push(slide_xml);
    }

    /// Serialize the package into a byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Serialize the package into a seekable writer.
    ///
    /// Entries carry a fixed timestamp so that equal decks produce equal bytes.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut add = |path: &str, content: &str| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        add("[Content_Types].xml", &self.content_types_xml()?)?;
        add("_rels/.rels", &root_rels_xml()?)?;
        add("docProps/core.xml", &self.core_props_xml()?)?;
        add("docProps/app.xml", &self.app_props_xml()?)?;
        add("ppt/presentation.xml", &self.presentation_xml()?)?;
        add("ppt/_rels/presentation.xml.rels", &self.presentation_rels_xml()?)?;
        add("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML)?;
        add("ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS_XML)?;
        add("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML)?;
        add("ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS_XML)?;
        add("ppt/theme/theme1.xml", THEME_XML)?;
        add("ppt/presProps.xml", PRES_PROPS_XML)?;
        add("ppt/viewProps.xml", VIEW_PROPS_XML)?;
        add("ppt/tableStyles.xml", TABLE_STYLES_XML)?;

        let slide_rels = slide_rels_xml()?;
        for (idx, slide) in self.slides.iter().enumerate() {
            let number = idx + 1;
            add(&format!("ppt/slides/slide{}.xml", number), slide)?;
            add(&format!("ppt/slides/_rels/slide{}.xml.rels", number), &slide_rels)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!("Packaged {} slides for '{}'", self.slides.len(), self.title);
        Ok(())
    }

    fn content_types_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new()?;
        xml.start(
            "Types",
            &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
        )?;
        xml.empty("Default", &[("Extension", "rels"), ("ContentType", content_types::RELS)])?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", content_types::XML)])?;

        let fixed = [
            ("/ppt/presentation.xml", content_types::PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml", content_types::SLIDE_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml", content_types::SLIDE_LAYOUT),
            ("/ppt/theme/theme1.xml", content_types::THEME),
            ("/ppt/presProps.xml", content_types::PRES_PROPS),
            ("/ppt/viewProps.xml", content_types::VIEW_PROPS),
            ("/ppt/tableStyles.xml", content_types::TABLE_STYLES),
            ("/docProps/core.xml", content_types::CORE_PROPS),
            ("/docProps/app.xml", content_types::APP_PROPS),
        ];
        for (part, content_type) in fixed {
            xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
        }

        for number in 1..=self.slides.len() {
            let part = format!("/ppt/slides/slide{}.xml", number);
            xml.empty(
                "Override",
                &[("PartName", part.as_str()), ("ContentType", content_types::SLIDE)],
            )?;
        }

        xml.end("Types")?;
        xml.finish()
    }

    fn presentation_xml(&self) -> Result<String> {
        let width = self.slide_width.to_string();
        let height = self.slide_height.to_string();
        let notes_width = NOTES_WIDTH.to_string();
        let notes_height = NOTES_HEIGHT.to_string();

        let mut xml = XmlBuilder::new()?;
        xml.start(
            "p:presentation",
            &[
                ("xmlns:a", NS_A),
                ("xmlns:r", NS_R),
                ("xmlns:p", NS_P),
                ("saveSubsetFonts", "1"),
            ],
        )?;

        xml.start("p:sldMasterIdLst", &[])?;
        xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
        xml.end("p:sldMasterIdLst")?;

        if !self.slides.is_empty() {
            xml.start("p:sldIdLst", &[])?;
            for number in 1..=self.slides.len() {
                let id = (FIRST_SLIDE_ID + number - 1).to_string();
                let rel_id = slide_rel_id(number);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
            }
            xml.end("p:sldIdLst")?;
        }

        xml.empty("p:sldSz", &[("cx", width.as_str()), ("cy", height.as_str())])?;
        xml.empty("p:notesSz", &[("cx", notes_width.as_str()), ("cy", notes_height.as_str())])?;
        xml.end("p:presentation")?;
        xml.finish()
    }

    fn presentation_rels_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new()?;
        xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;

        let fixed = [
            ("rId1", rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            ("rId2", rel_types::THEME, "theme/theme1.xml"),
            ("rId3", rel_types::PRES_PROPS, "presProps.xml"),
            ("rId4", rel_types::VIEW_PROPS, "viewProps.xml"),
            ("rId5", rel_types::TABLE_STYLES, "tableStyles.xml"),
        ];
        for (id, rel_type, target) in fixed {
            relationship(&mut xml, id, rel_type, target)?;
        }

        for number in 1..=self.slides.len() {
            let target = format!("slides/slide{}.xml", number);
            relationship(&mut xml, &slide_rel_id(number), rel_types::SLIDE, &target)?;
        }

        xml.end("Relationships")?;
        xml.finish()
    }

    fn core_props_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new()?;
        xml.start(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        xml.element("dc:title", &self.title)?;
        xml.element("dc:creator", APPLICATION)?;
        xml.element("cp:revision", "1")?;
        xml.end("cp:coreProperties")?;
        xml.finish()
    }

    fn app_props_xml(&self) -> Result<String> {
        let slides = self.slides.len().to_string();

        let mut xml = XmlBuilder::new()?;
        xml.start(
            "Properties",
            &[(
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            )],
        )?;
        xml.element("Application", APPLICATION)?;
        xml.element("PresentationFormat", "Custom")?;
        xml.element("Slides", &slides)?;
        xml.end("Properties")?;
        xml.finish()
    }
}

fn relationship(xml: &mut XmlBuilder, id: &str, rel_type: &str, target: &str) -> Result<()> {
    xml.empty(
        "Relationship",
        &[("Id", id), ("Type", rel_type), ("Target", target)],
    )?;
    Ok(())
}

fn root_rels_xml() -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, "rId1", rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml")?;
    relationship(&mut xml, "rId2", rel_types::CORE_PROPS, "docProps/core.xml")?;
    relationship(&mut xml, "rId3", rel_types::APP_PROPS, "docProps/app.xml")?;
    xml.end("Relationships")?;
    xml.finish()
}

/// Every slide points at the single blank layout.
fn slide_rels_xml() -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(
        &mut xml,
        "rId1",
        rel_types::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )?;
    xml.end("Relationships")?;
    xml.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn package_with(slides: usize) -> DeckPackage {
        let mut package = DeckPackage::new("Amazing Grace", &StyleConfig::default());
        for n in 0..slides {
            package.add_slide(format!("<p:sld><!-- {} --></p:sld>", n));
        }
        package
    }

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = package_with(2).to_bytes().unwrap();
        let archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&required), "missing part {}", required);
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_starts_with_zip_magic() {
        let bytes = package_with(1).to_bytes().unwrap();
        assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let bytes = package_with(3).to_bytes().unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");

        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="258" r:id="rId8"/>"#));
        assert!(presentation.contains(r#"<p:sldSz cx="12188952" cy="6858000"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId8""#));
        assert!(rels.contains(r#"Target="slides/slide3.xml""#));
    }

    #[test]
    fn test_content_types_override_every_slide() {
        let bytes = package_with(2).to_bytes().unwrap();
        let types = read_part(&bytes, "[Content_Types].xml");

        assert!(types.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(types.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(types.contains(content_types::PRESENTATION));
    }

    #[test]
    fn test_core_properties_carry_escaped_title() {
        let package = DeckPackage::new("Rock & Roll", &StyleConfig::default());
        let bytes = package.to_bytes().unwrap();
        let core = read_part(&bytes, "docProps/core.xml");

        assert!(core.contains("<dc:title>Rock &amp; Roll</dc:title>"));
    }

    #[test]
    fn test_empty_package_omits_slide_list() {
        let bytes = package_with(0).to_bytes().unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");

        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = package_with(2).to_bytes().unwrap();
        let second = package_with(2).to_bytes().unwrap();
        assert_eq!(first, second);
    }
}
