//! Small streaming XML builder over `quick-xml`.

use lyrics_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// DrawingML namespace.
pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// PresentationML namespace.
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
/// Office document relationships namespace.
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships namespace.
pub const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Builds one XML part as a string.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a standalone UTF-8 document.
    pub fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(element))?;
        Ok(self)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(element))?;
        Ok(self)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.event(Event::Text(BytesText::new(text)))?;
        Ok(self)
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// Write `<name>text</name>`.
    pub fn element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name, &[])?.text(text)?.end(name)
    }

    /// Finish the document.
    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::XmlError(format!("Generated XML is not UTF-8: {}", e)))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }
}
