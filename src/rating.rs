use serde::Deserialize;

use crate::catalog::Catalog;
use crate::models::BookId;

pub const FULL_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';
pub const MAX_RATING: u8 = 5;

/// Star rating in `0..=5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "i64")]
pub struct Rating(u8);

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Self(value.clamp(0, i64::from(MAX_RATING)) as u8)
    }
}

impl Rating {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_RATING))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Rating after a click on `star` (1-based). Re-clicking the current top
    /// star steps the rating down by one.
    pub fn after_click(self, star: u8) -> Self {
        if star == self.0 {
            Self(self.0.saturating_sub(1))
        } else {
            Self::new(star)
        }
    }
}

/// `rate` filled stars followed by `5 - rate` empty ones.
pub fn render_stars(rating: Rating) -> String {
    (1..=MAX_RATING)
        .map(|star| star_glyph(rating, star))
        .collect()
}

pub fn star_glyph(rating: Rating, star: u8) -> char {
    if star <= rating.value() {
        FULL_STAR
    } else {
        EMPTY_STAR
    }
}

/// Five-star widget bound to a single book of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingControl {
    book: BookId,
}

impl RatingControl {
    pub fn bind(book: BookId) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &BookId {
        &self.book
    }

    pub fn current(&self, catalog: &Catalog) -> Option<Rating> {
        catalog.get(&self.book).map(|book| book.rate)
    }

    pub fn stars(&self, catalog: &Catalog) -> String {
        render_stars(self.current(catalog).unwrap_or_default())
    }

    /// Applies a click on `star` to the bound book. Returns the new rating,
    /// or `None` when the star is out of range or the book is unknown.
    pub fn click(&self, catalog: &mut Catalog, star: u8) -> Option<Rating> {
        if !(1..=MAX_RATING).contains(&star) {
            return None;
        }
        let book = catalog.get_mut(&self.book)?;
        book.rate = book.rate.after_click(star);
        Some(book.rate)
    }
}
