use std::sync::Arc;

use lyrics_core::StyleConfig;
use lyrics_pptx::DeckBuilder;

use crate::config::Config;

/// Shared application state injected into all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<DeckBuilder>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let builder = DeckBuilder::with_style(StyleConfig::for_profile(config.profile));
        Self {
            builder: Arc::new(builder),
            config,
        }
    }
}
