//! tubeseg Server
//!
//! Exposes the dispatcher as named RPC methods with positional arguments:
//!
//! - `app.load_file(filename) -> imageId`
//! - `app.unload_image(imageId)`
//! - `app.segment(imageId, [i, j, k], {scale}) -> {uid, points?, radii?}`
//! - `app.get_tube(imageId, uid) -> {uid, points, radii}`
//! - `app.list_images() -> [{id, sourcePath, state, tubeCount, loadedAt}]`
//!
//! Requests and responses travel as one JSON object per line over stdio.

pub mod commands;
pub mod state;
pub mod transport;

use state::AppState;
use tubeseg_core::{Config, ScriptedEngine};

/// Serve requests from stdin until it closes.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(ScriptedEngine::new(), config);

    tracing::info!("tubeseg server started");

    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    transport::serve(state, reader, tokio::io::stdout()).await?;

    tracing::info!("tubeseg server stopped");

    Ok(())
}
