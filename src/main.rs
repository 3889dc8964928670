mod api;
mod app;
mod catalog;
mod config;
mod logging;
mod models;
mod rating;
mod reading_list;
mod session;
mod tui;

use anyhow::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::AppConfig::from_env()?;
    config.ensure_filesystem()?;
    let _log_guard = logging::init(&config)?;

    info!(
        session = config.session_id(),
        source = %config.catalog_source(),
        "starting bookshelf"
    );

    let (msg_tx, msg_rx) = tokio::sync::mpsc::unbounded_channel();

    let client = api::catalog::CatalogClient::new(&config)?;
    let controller = tui::AppController::new(client, msg_tx);

    let app = tui::App::new(controller, msg_rx);
    tui::run(app).await
}
