use crate::models::{Book, BookId};

/// Books loaded from the catalog resource. Membership is fixed after load;
/// only ratings change.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Matches(Vec<BookId>),
    NoMatches,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[cfg(test)]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn ids(&self) -> Vec<BookId> {
        self.books.iter().map(|book| book.id.clone()).collect()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    pub fn get_mut(&mut self, id: &BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| &book.id == id)
    }

    /// Books whose title or author contains `query`, ignoring case, in
    /// catalog order. The query is not trimmed; an empty query returns every
    /// book.
    pub fn search(&self, query: &str) -> SearchResult {
        if query.is_empty() {
            return SearchResult::Matches(self.ids());
        }

        let needle = query.to_lowercase();
        let matches: Vec<BookId> = self
            .books
            .iter()
            .filter(|book| book.matches(&needle))
            .map(|book| book.id.clone())
            .collect();

        if matches.is_empty() {
            SearchResult::NoMatches
        } else {
            SearchResult::Matches(matches)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::rating::Rating;

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: BookId::new(id),
            title: title.into(),
            author: author.into(),
            image: String::new(),
            description: String::new(),
            rate: Rating::default(),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            book("1", "Dune", "Frank Herbert"),
            book("2", "Emma", "Jane Austen"),
            book("3", "Persuasion", "Jane Austen"),
            book("4", "Hyperion", "Dan Simmons"),
        ])
    }

    #[test]
    fn empty_query_returns_whole_catalog() {
        let catalog = sample();
        assert_eq!(catalog.search(""), SearchResult::Matches(catalog.ids()));
    }

    #[test]
    fn matches_title_or_author_case_insensitively() {
        let catalog = sample();
        assert_eq!(
            catalog.search("AUSTEN"),
            SearchResult::Matches(vec![BookId::new("2"), BookId::new("3")])
        );
        assert_eq!(
            catalog.search("hyp"),
            SearchResult::Matches(vec![BookId::new("4")])
        );
    }

    #[test]
    fn whitespace_is_part_of_the_query() {
        let catalog = sample();
        assert_eq!(
            catalog.search(" emma"),
            SearchResult::NoMatches
        );
        assert_eq!(
            catalog.search("jane "),
            SearchResult::Matches(vec![BookId::new("2"), BookId::new("3")])
        );
    }

    #[test]
    fn unknown_query_reports_no_matches() {
        let catalog = Catalog::new(vec![book("1", "Dune", "Herbert")]);
        assert_eq!(catalog.search("xyz123"), SearchResult::NoMatches);
    }

    fn arb_catalog() -> impl Strategy<Value = Catalog> {
        prop::collection::vec(("[a-zA-Z ]{0,12}", "[a-zA-Z ]{0,12}"), 0..12).prop_map(|rows| {
            Catalog::new(
                rows.into_iter()
                    .enumerate()
                    .map(|(idx, (title, author))| book(&idx.to_string(), &title, &author))
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn results_are_ordered_subset_that_match(catalog in arb_catalog(), query in "[a-zA-Z]{1,3}") {
            let needle = query.to_lowercase();
            match catalog.search(&query) {
                SearchResult::Matches(ids) => {
                    prop_assert!(!ids.is_empty());
                    let positions: Vec<usize> = ids
                        .iter()
                        .map(|id| catalog.books().iter().position(|b| &b.id == id).unwrap())
                        .collect();
                    prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
                    for id in &ids {
                        let book = catalog.get(id).unwrap();
                        prop_assert!(
                            book.title.to_lowercase().contains(&needle)
                                || book.author.to_lowercase().contains(&needle)
                        );
                    }
                }
                SearchResult::NoMatches => {
                    prop_assert!(catalog.books().iter().all(|b| !b.matches(&needle)));
                }
            }
        }
    }
}
