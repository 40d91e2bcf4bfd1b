use std::sync::LazyLock;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::Response,
    Form,
};
use lyrics_core::naming::{presentation_name, resolve_filename, DEFAULT_PRESENTATION_NAME};
use lyrics_core::style::parse_font_size;
use lyrics_core::{FontPreferences, LyricsDocument, ScriptCategory};
use lyrics_pptx::PPTX_CONTENT_TYPE;
use regex::Regex;
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

/// Characters that may not appear in the plain `filename` parameter.
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^A-Za-z0-9 ._()\-]+"#).unwrap());

/// Fields posted by the lyrics form.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub presentation_name: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub english_font: Option<String>,
    #[serde(default)]
    pub hindi_font: Option<String>,
    #[serde(default)]
    pub telugu_font: Option<String>,
}

impl GenerateForm {
    fn font_preferences(&self) -> FontPreferences {
        let mut preferences = FontPreferences::new();
        preferences.set_opt(ScriptCategory::English, self.english_font.as_deref());
        preferences.set_opt(ScriptCategory::Hindi, self.hindi_font.as_deref());
        preferences.set_opt(ScriptCategory::Telugu, self.telugu_font.as_deref());
        preferences
    }
}

/// POST /generate
/// Builds a deck from the posted lyrics and returns it as a download.
pub async fn generate_handler(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Response, AppError> {
    let document = LyricsDocument::new(form.lyrics.clone().unwrap_or_default())?;
    let name = presentation_name(form.presentation_name.as_deref().unwrap_or_default()).to_string();
    let preferences = form.font_preferences();
    let font_size = parse_font_size(form.font_size.as_deref());

    let builder = state.builder.clone();
    let result = tokio::task::spawn_blocking(move || {
        builder.build(document.as_str(), &name, &preferences, font_size)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Deck build task failed: {e}")))??;

    log::info!(
        "Generated {} ({} slides, {} bytes)",
        result.filename,
        result.slide_count,
        result.bytes.len()
    );

    Response::builder()
        .header(header::CONTENT_TYPE, PPTX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&result.filename)?,
        )
        .header(header::CACHE_CONTROL, "no-store")
        .header("X-Slide-Count", result.slide_count)
        .body(Body::from(result.bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// `attachment` disposition with an ASCII fallback name and the exact UTF-8
/// name as an RFC 5987 `filename*` parameter.
fn content_disposition(filename: &str) -> Result<HeaderValue, AppError> {
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_filename(filename),
        urlencoding::encode(filename)
    );

    HeaderValue::from_str(&value).map_err(|e| AppError::Internal(e.to_string()))
}

fn ascii_filename(filename: &str) -> String {
    let safe = UNSAFE_FILENAME_CHARS.replace_all(filename, "_");
    let stem = safe.trim_end_matches(".pptx").trim_matches(|c| c == '_' || c == ' ');

    if stem.is_empty() || stem.chars().all(|c| c == '_' || c == '.') {
        resolve_filename(DEFAULT_PRESENTATION_NAME)
    } else {
        safe.into_owned()
    }
}
