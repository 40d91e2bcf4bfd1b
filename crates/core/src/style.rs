//! Slide styling configuration.
//!
//! Styling is an immutable value built from a [`StyleProfile`]; the only
//! caller-adjustable setting is the font size.

use crate::error::{Error, Result};
use std::fmt;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Largest run size DrawingML accepts, in points.
pub const MAX_FONT_SIZE_PT: u32 = 400;

/// Convert inches to EMU.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH).round() as i64
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);

    /// Hex form used by `a:srgbClr`, e.g. `FFFFFF`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Built-in styling profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleProfile {
    /// 36 pt lyrics.
    #[default]
    Classic,
    /// 48 pt lyrics for large rooms.
    Stage,
}

impl StyleProfile {
    /// Default font size of the profile, in points.
    pub fn default_font_size(&self) -> u32 {
        match self {
            Self::Classic => 36,
            Self::Stage => 48,
        }
    }

    /// Lowercase profile name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Stage => "stage",
        }
    }
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StyleProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "stage" => Ok(Self::Stage),
            other => Err(Error::UnknownProfile(other.to_string())),
        }
    }
}

/// Everything needed to lay out and color a lyrics slide.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Profile this configuration was derived from.
    pub profile: StyleProfile,

    /// Lyric font size in points.
    pub font_size_pt: u32,

    pub text_color: RgbColor,
    pub background_color: RgbColor,
    pub bold: bool,

    /// Line spacing as a multiple of single spacing.
    pub line_spacing: f64,

    /// Space before the second line of a slide, in points.
    pub paragraph_spacing_pt: u32,

    /// Slide width in EMU.
    pub slide_width: i64,

    /// Slide height in EMU.
    pub slide_height: i64,

    /// Lyrics text box.
    pub text_frame: Frame,
}

impl StyleConfig {
    /// Style for a profile.
    pub fn for_profile(profile: StyleProfile) -> Self {
        Self {
            profile,
            font_size_pt: profile.default_font_size(),
            text_color: RgbColor::WHITE,
            background_color: RgbColor::BLACK,
            bold: true,
            line_spacing: 1.2,
            paragraph_spacing_pt: 12,
            slide_width: inches(13.33),
            slide_height: inches(7.5),
            text_frame: Frame {
                x: inches(0.665),
                y: inches(2.5),
                width: inches(12.0),
                height: inches(4.0),
            },
        }
    }

    /// Copy of this style using `size` when one was given.
    ///
    /// `None` and zero keep the profile default; sizes above
    /// [`MAX_FONT_SIZE_PT`] are clamped.
    pub fn with_font_size(&self, size: Option<u32>) -> Self {
        let mut style = self.clone();
        if let Some(size) = size.filter(|&s| s > 0) {
            style.font_size_pt = size.min(MAX_FONT_SIZE_PT);
        }
        style
    }

    /// Font size in hundredths of a point, as written on `a:rPr/@sz`.
    pub fn font_size_centipoints(&self) -> u32 {
        self.font_size_pt * 100
    }

    /// Line spacing in thousandths of a percent, as written on `a:spcPct/@val`.
    pub fn line_spacing_percent(&self) -> u32 {
        (self.line_spacing * 100_000.0).round() as u32
    }

    /// Paragraph spacing in hundredths of a point, as written on `a:spcPts/@val`.
    pub fn paragraph_spacing_centipoints(&self) -> u32 {
        self.paragraph_spacing_pt * 100
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::for_profile(StyleProfile::default())
    }
}

/// Parse a font size typed into a form or passed on the command line.
///
/// Absent, blank, non-numeric and non-positive input all yield `None`, which
/// means "use the default".
pub fn parse_font_size(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&size| size > 0)
}
