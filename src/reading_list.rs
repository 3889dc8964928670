use crate::catalog::Catalog;
use crate::models::{Book, BookId};

/// Books the user chose to keep, in insertion order, unique by id. Entries
/// refer back into the catalog so rating changes show up here too.
#[derive(Debug, Clone, Default)]
pub struct ReadingList {
    entries: Vec<BookId>,
}

impl ReadingList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[BookId] {
        &self.entries
    }

    pub fn contains(&self, id: &BookId) -> bool {
        self.entries.contains(id)
    }

    /// Appends `book` unless an entry with the same id exists.
    pub fn add(&mut self, book: &Book) -> bool {
        if self.contains(&book.id) {
            return false;
        }
        self.entries.push(book.id.clone());
        true
    }

    /// Drops every entry whose title equals `title`. Keyed by title, so two
    /// distinct books sharing a title are removed together.
    pub fn remove_by_title(&mut self, catalog: &Catalog, title: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id| {
            catalog
                .get(id)
                .map(|book| book.title != title)
                .unwrap_or(true)
        });
        before - self.entries.len()
    }

    /// Resolved entries, skipping ids the catalog no longer knows.
    pub fn books<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Book> + 'a {
        self.entries.iter().filter_map(move |id| catalog.get(id))
    }
}
