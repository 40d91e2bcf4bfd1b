use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error type returned by the route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Deck(#[from] lyrics_core::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Deck(lyrics_core::Error::EmptyLyrics) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_LYRICS",
                "Lyrics text is required.".to_string(),
            ),
            AppError::Deck(e) => {
                log::error!("Deck build failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DECK_ERROR",
                    "The presentation could not be built".to_string(),
                )
            }
            AppError::Internal(msg) => {
                log::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
