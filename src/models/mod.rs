pub mod book;

pub use book::{Book, BookId, CatalogDocument};
