use crate::models::Book;

#[derive(Debug, Clone)]
pub enum AppMessage {
    CatalogLoaded(Vec<Book>),
    CatalogFailed(String),
}
