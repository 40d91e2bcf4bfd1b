//! PPTX (Office Open XML) backend for lyrics slide decks.
//!
//! Writes decks as ZIP archives of PresentationML parts and reads them back
//! for inspection.

pub mod builder;
pub mod package;
pub mod reader;
pub mod slide;
mod xml;

pub use builder::DeckBuilder;
pub use package::{DeckPackage, PPTX_CONTENT_TYPE};
pub use reader::{DeckOutline, DeckReader, ParagraphOutline, SlideOutline};
