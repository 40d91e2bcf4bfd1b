//! Core domain types, line normalization, pagination and script-aware font
//! selection for lyrics slide decks.

pub mod error;
pub mod fonts;
pub mod layout;
pub mod naming;
pub mod normalize;
pub mod style;
pub mod types;

pub use error::{Error, Result};
pub use fonts::{FontChoice, FontPreferences, FontResolver};
pub use normalize::LineNormalizer;
pub use style::{RgbColor, StyleConfig, StyleProfile};
pub use types::{DeckResult, LyricsDocument, ScriptCategory, SlideGroup};
