//! Script detection and font resolution.
//!
//! Each line is assigned a [`ScriptCategory`] from the Unicode blocks it
//! uses. The category picks the caller's preferred font or the built-in
//! default, which is then swapped for its bold face when the catalog knows
//! one.

use crate::types::ScriptCategory;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Devanagari block.
const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097f}';

/// Telugu block.
const TELUGU: RangeInclusive<char> = '\u{0c00}'..='\u{0c7f}';

/// Default font for Latin text.
pub const DEFAULT_ENGLISH_FONT: &str = "Calibri";

/// Default font for Devanagari text.
pub const DEFAULT_HINDI_FONT: &str = "Noto Sans Devanagari";

/// Default font for Telugu text.
pub const DEFAULT_TELUGU_FONT: &str = "Noto Sans Telugu";

const ENGLISH_FONTS: &[&str] = &[
    "Calibri",
    "Arial",
    "Arial Black",
    "Segoe UI",
    "Segoe UI Black",
    "Montserrat",
    "Montserrat Bold",
    "Open Sans",
    "Open Sans Bold",
    "Roboto",
    "Roboto Bold",
    "Lato",
    "Lato Bold",
];

const HINDI_FONTS: &[&str] = &[
    "Noto Sans Devanagari",
    "Noto Sans Devanagari Bold",
    "Nirmala UI",
    "Nirmala UI Bold",
    "Mangal",
    "Kokila",
    "Hind",
    "Hind Bold",
];

const TELUGU_FONTS: &[&str] = &[
    "Noto Sans Telugu",
    "Noto Sans Telugu Bold",
    "Nirmala UI",
    "Nirmala UI Bold",
    "Gautami",
    "Vani",
    "Ramabhadra",
    "Mandali",
];

/// Bold variants per category keyed by base font, built once from the catalog.
static BOLD_VARIANTS: LazyLock<HashMap<ScriptCategory, HashMap<&'static str, String>>> =
    LazyLock::new(|| {
        ScriptCategory::ALL
            .into_iter()
            .map(|category| {
                let known = known_fonts(category);
                let variants = known
                    .iter()
                    .filter_map(|&base| {
                        let bold = format!("{} Bold", base);
                        known.iter().any(|&name| name == bold).then_some((base, bold))
                    })
                    .collect();
                (category, variants)
            })
            .collect()
    });

/// Detect the script category of a line.
///
/// Any Devanagari code point wins, then any Telugu code point; everything
/// else is treated as Latin.
pub fn detect_script(line: &str) -> ScriptCategory {
    if line.chars().any(|c| DEVANAGARI.contains(&c)) {
        ScriptCategory::Hindi
    } else if line.chars().any(|c| TELUGU.contains(&c)) {
        ScriptCategory::Telugu
    } else {
        ScriptCategory::English
    }
}

/// Built-in default font for a category.
pub fn default_font(category: ScriptCategory) -> &'static str {
    match category {
        ScriptCategory::English => DEFAULT_ENGLISH_FONT,
        ScriptCategory::Hindi => DEFAULT_HINDI_FONT,
        ScriptCategory::Telugu => DEFAULT_TELUGU_FONT,
    }
}

/// Font names known for a category.
pub fn known_fonts(category: ScriptCategory) -> &'static [&'static str] {
    match category {
        ScriptCategory::English => ENGLISH_FONTS,
        ScriptCategory::Hindi => HINDI_FONTS,
        ScriptCategory::Telugu => TELUGU_FONTS,
    }
}

/// Whether a font name already names a heavy weight.
fn names_heavy_weight(font: &str) -> bool {
    let lower = font.to_lowercase();
    lower.contains("bold") || lower.contains("black")
}

/// Prefer the bold face of `font` when the catalog lists one.
pub fn bold_variant(category: ScriptCategory, font: &str) -> String {
    if names_heavy_weight(font) {
        return font.to_string();
    }

    BOLD_VARIANTS
        .get(&category)
        .and_then(|variants| variants.get(font))
        .cloned()
        .unwrap_or_else(|| font.to_string())
}

/// Caller font choices per script category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPreferences {
    fonts: HashMap<ScriptCategory, String>,
}

impl FontPreferences {
    /// No preferences; every category uses its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font for a category. Blank names are ignored.
    pub fn with_font(mut self, category: ScriptCategory, font: impl Into<String>) -> Self {
        self.set(category, font);
        self
    }

    /// Set the font for a category. Blank names clear the preference.
    pub fn set(&mut self, category: ScriptCategory, font: impl Into<String>) {
        let font: String = font.into();
        let font = font.trim();
        if font.is_empty() {
            self.fonts.remove(&category);
        } else {
            self.fonts.insert(category, font.to_string());
        }
    }

    /// Set the font for a category if one was supplied.
    pub fn set_opt(&mut self, category: ScriptCategory, font: Option<&str>) {
        if let Some(font) = font {
            self.set(category, font);
        }
    }

    /// The caller's font for a category, if any.
    pub fn get(&self, category: ScriptCategory) -> Option<&str> {
        self.fonts.get(&category).map(String::as_str)
    }
}

/// A font decision for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChoice {
    /// Script category the line was detected as.
    pub category: ScriptCategory,

    /// Font name to write on the run.
    pub typeface: String,
}

/// Resolves the font for each line from caller preferences.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    preferences: FontPreferences,
}

impl FontResolver {
    /// Create a resolver over the given preferences.
    pub fn new(preferences: FontPreferences) -> Self {
        Self { preferences }
    }

    /// Font name for a category, before the bold refinement.
    pub fn base_font(&self, category: ScriptCategory) -> &str {
        self.preferences
            .get(category)
            .unwrap_or_else(|| default_font(category))
    }

    /// Choose the font for a line.
    pub fn resolve(&self, line: &str) -> FontChoice {
        let category = detect_script(line);
        FontChoice {
            category,
            typeface: bold_variant(category, self.base_font(category)),
        }
    }
}
