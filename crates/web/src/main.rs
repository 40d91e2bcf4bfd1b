//! Web front end: paste lyrics into a form, download a slide deck.

mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting lyrics-web v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Style profile: {} ({}pt)",
        config.profile,
        config.profile.default_font_size()
    );

    let addr = config.bind_addr();
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
