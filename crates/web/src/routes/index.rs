use axum::{extract::State, response::Html};
use lyrics_core::fonts::{default_font, known_fonts};
use lyrics_core::ScriptCategory;

use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// GET /
/// The lyrics form, with font suggestions for each script.
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.builder.style().font_size_pt))
}

fn render_index(font_size_pt: u32) -> String {
    let mut page = INDEX_TEMPLATE.replace("{{font_size}}", &font_size_pt.to_string());

    for category in ScriptCategory::ALL {
        page = page
            .replace(
                &format!("{{{{{}_default}}}}", category.key()),
                default_font(category),
            )
            .replace(
                &format!("{{{{{}_options}}}}", category.key()),
                &font_options(category),
            );
    }

    page
}

fn font_options(category: ScriptCategory) -> String {
    known_fonts(category)
        .iter()
        .map(|font| format!("<option value=\"{font}\"></option>"))
        .collect::<Vec<_>>()
        .join("\n      ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index_fills_placeholders() {
        let page = render_index(36);

        assert!(!page.contains("{{"));
        assert!(page.contains("value=\"36\""));
        assert!(page.contains("placeholder=\"Noto Sans Devanagari\""));
        assert!(page.contains("<option value=\"Ramabhadra\"></option>"));
    }
}
