use tokio::sync::mpsc::UnboundedSender;
use tokio::task;
use tracing::{error, info};

use crate::api::catalog::CatalogClient;
use crate::app::AppMessage;

#[derive(Clone)]
pub struct AppController {
    client: CatalogClient,
    message_tx: UnboundedSender<AppMessage>,
}

impl AppController {
    pub fn new(client: CatalogClient, message_tx: UnboundedSender<AppMessage>) -> Self {
        Self { client, message_tx }
    }

    /// Starts the one and only catalog fetch. The outcome arrives later as an
    /// `AppMessage`; failures are logged and never retried.
    pub fn load_catalog(&self) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        task::spawn(async move {
            info!(source = %client.source(), "fetching catalog");
            match client.fetch_books().await {
                Ok(books) => {
                    let _ = tx.send(AppMessage::CatalogLoaded(books));
                }
                Err(err) => {
                    error!("Error fetching books data: {err}");
                    let _ = tx.send(AppMessage::CatalogFailed(err.to_string()));
                }
            }
        });
    }
}
