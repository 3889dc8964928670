use std::fmt;

use serde::Deserialize;

use crate::rating::Rating;

/// Identifier of a book in the catalog. Documents use either numbers or
/// strings, so both are accepted and compared by their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawBookId")]
pub struct BookId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBookId {
    Number(i64),
    Text(String),
}

impl From<RawBookId> for BookId {
    fn from(raw: RawBookId) -> Self {
        match raw {
            RawBookId::Number(n) => Self(n.to_string()),
            RawBookId::Text(s) => Self(s),
        }
    }
}

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rate: Rating,
}

impl Book {
    /// Case-insensitive substring match against title or author.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

/// Top-level shape of the catalog resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub books: Vec<Book>,
}
