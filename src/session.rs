use tracing::{debug, info};

use crate::catalog::{Catalog, SearchResult};
use crate::models::{Book, BookId};
use crate::rating::{Rating, RatingControl};
use crate::reading_list::ReadingList;

/// What the book list panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Books(Vec<BookId>),
    NoMatches,
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Books(Vec::new())
    }
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Listing::Books(ids) => ids.len(),
            Listing::NoMatches => 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<&BookId> {
        match self {
            Listing::Books(ids) => ids.get(index),
            Listing::NoMatches => None,
        }
    }
}

impl From<SearchResult> for Listing {
    fn from(result: SearchResult) -> Self {
        match result {
            SearchResult::Matches(ids) => Listing::Books(ids),
            SearchResult::NoMatches => Listing::NoMatches,
        }
    }
}

/// User intents, independent of whether they came from a click or a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    OpenDetail(BookId),
    Back,
    AddToReadingList(BookId),
    AddSelectedToReadingList,
    RemoveFromReadingList(String),
    ClickStar { book: BookId, star: u8 },
}

/// All state of one catalog session.
#[derive(Debug, Default)]
pub struct Session {
    catalog: Option<Catalog>,
    listing: Listing,
    reading_list: ReadingList,
    selected: Option<BookId>,
    query: String,
}

impl Session {
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn reading_list(&self) -> &ReadingList {
        &self.reading_list
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&Book> {
        let id = self.selected.as_ref()?;
        self.catalog.as_ref()?.get(id)
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Installs the fetched catalog and lists every book.
    pub fn load_catalog(&mut self, books: Vec<Book>) {
        let catalog = Catalog::new(books);
        info!(books = catalog.len(), "catalog loaded");
        self.listing = Listing::Books(catalog.ids());
        self.catalog = Some(catalog);
    }

    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatch");
        match command {
            Command::Search(query) => self.search(query),
            Command::OpenDetail(id) => self.open_detail(id),
            Command::Back => self.selected = None,
            Command::AddToReadingList(id) => self.add_to_reading_list(&id),
            Command::AddSelectedToReadingList => {
                if let Some(id) = self.selected.clone() {
                    self.add_to_reading_list(&id);
                }
            }
            Command::RemoveFromReadingList(title) => self.remove_from_reading_list(&title),
            Command::ClickStar { book, star } => self.click_star(book, star),
        }
    }

    fn search(&mut self, query: String) {
        self.query = query;
        let Some(catalog) = &self.catalog else {
            debug!("search ignored, catalog not loaded");
            return;
        };
        self.listing = catalog.search(&self.query).into();
    }

    fn open_detail(&mut self, id: BookId) {
        if self.catalog.as_ref().and_then(|c| c.get(&id)).is_some() {
            self.selected = Some(id);
        } else {
            debug!(%id, "open detail ignored, unknown book");
        }
    }

    fn add_to_reading_list(&mut self, id: &BookId) {
        let Some(book) = self.catalog.as_ref().and_then(|c| c.get(id)) else {
            debug!(%id, "add ignored, unknown book");
            return;
        };
        if self.reading_list.add(book) {
            info!(%id, title = %book.title, "added to reading list");
        }
    }

    fn remove_from_reading_list(&mut self, title: &str) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let removed = self.reading_list.remove_by_title(catalog, title);
        info!(title, removed, "removed from reading list");
    }

    fn click_star(&mut self, book: BookId, star: u8) {
        let Some(catalog) = self.catalog.as_mut() else {
            return;
        };
        let control = RatingControl::bind(book);
        match control.click(catalog, star) {
            Some(rating) => log_rating(control.book(), rating),
            None => debug!(book = %control.book(), star, "star click ignored"),
        }
    }
}

fn log_rating(book: &BookId, rating: Rating) {
    info!(%book, rate = rating.value(), "rating changed");
}
