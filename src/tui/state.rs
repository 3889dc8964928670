use chrono::{DateTime, Local};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::app::AppMessage;
use crate::models::BookId;
use crate::session::{Command, Session};

use super::controller::AppController;
use super::hit::{HitMap, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Search,
    Books,
    ReadingList,
}

impl FocusArea {
    pub fn next(self) -> Self {
        match self {
            FocusArea::Search => FocusArea::Books,
            FocusArea::Books => FocusArea::ReadingList,
            FocusArea::ReadingList => FocusArea::Search,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FocusArea::Search => FocusArea::ReadingList,
            FocusArea::Books => FocusArea::Search,
            FocusArea::ReadingList => FocusArea::Books,
        }
    }
}

pub struct App {
    pub controller: AppController,
    pub msg_rx: UnboundedReceiver<AppMessage>,
    pub session: Session,
    pub book_state: ListState,
    pub reading_state: ListState,
    pub hits: HitMap,
    pub loaded_at: Option<DateTime<Local>>,
    pub focus: FocusArea,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: AppController, msg_rx: UnboundedReceiver<AppMessage>) -> Self {
        Self {
            controller,
            msg_rx,
            session: Session::default(),
            book_state: ListState::default(),
            reading_state: ListState::default(),
            hits: HitMap::default(),
            loaded_at: None,
            focus: FocusArea::Search,
            should_quit: false,
        }
    }

    pub fn bootstrap(&mut self) {
        self.controller.load_catalog();
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::CatalogLoaded(books) => {
                self.session.load_catalog(books);
                self.loaded_at = Some(Local::now());
                self.reset_book_selection();
            }
            AppMessage::CatalogFailed(reason) => {
                // Already logged by the loader; the list stays empty.
                warn!(%reason, "catalog unavailable for this session");
            }
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        let resets_list = matches!(command, Command::Search(_));
        self.session.dispatch(command);
        if resets_list {
            self.reset_book_selection();
        }
        self.clamp_selections();
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_focus(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_search_char(&mut self, ch: char) {
        let mut query = self.session.query().to_string();
        query.push(ch);
        self.dispatch(Command::Search(query));
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.session.query().to_string();
        if query.pop().is_some() {
            self.dispatch(Command::Search(query));
        }
    }

    pub fn clear_search(&mut self) {
        self.dispatch(Command::Search(String::new()));
    }

    /// Book under the list cursor, when the list panel is showing.
    pub fn highlighted_book(&self) -> Option<BookId> {
        self.book_state
            .selected()
            .and_then(|idx| self.session.listing().get(idx).cloned())
    }

    /// Title of the reading list row under the cursor.
    pub fn highlighted_reading_title(&self) -> Option<String> {
        let catalog = self.session.catalog()?;
        let idx = self.reading_state.selected()?;
        self.session
            .reading_list()
            .books(catalog)
            .nth(idx)
            .map(|book| book.title.clone())
    }

    /// Book the star keys act on: the open detail view, else the list cursor.
    pub fn rating_target(&self) -> Option<BookId> {
        match self.session.selected() {
            Some(book) => Some(book.id.clone()),
            None => self.highlighted_book(),
        }
    }

    pub fn move_book_selection(&mut self, delta: isize) {
        let len = self.session.listing().len();
        update_list_state(&mut self.book_state, len, delta);
    }

    pub fn move_reading_selection(&mut self, delta: isize) {
        let len = self.session.reading_list().len();
        update_list_state(&mut self.reading_state, len, delta);
    }

    /// Resolves a mouse click against the regions of the last frame.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let Some(target) = self.hits.target_at(column, row).cloned() else {
            return;
        };
        debug!(?target, column, row, "click");

        match &target {
            Target::SearchBar => self.focus = FocusArea::Search,
            Target::BookRow(id) | Target::AddButton(id) | Target::Star { book: id, .. } => {
                self.focus = FocusArea::Books;
                if !self.session.is_detail_open() {
                    self.highlight_book(id);
                }
            }
            Target::BackButton | Target::DetailAddButton => self.focus = FocusArea::Books,
            Target::ReadingRow(index) | Target::DeleteButton { index, .. } => {
                self.focus = FocusArea::ReadingList;
                self.reading_state.select(Some(*index));
            }
        }

        if let Some(command) = target.command() {
            self.dispatch(command);
        }
    }

    fn highlight_book(&mut self, id: &BookId) {
        let listing = self.session.listing();
        let position = (0..listing.len()).find(|idx| listing.get(*idx) == Some(id));
        if position.is_some() {
            self.book_state.select(position);
        }
    }

    fn reset_book_selection(&mut self) {
        let len = self.session.listing().len();
        *self.book_state.offset_mut() = 0;
        self.book_state.select(if len == 0 { None } else { Some(0) });
    }

    fn clamp_selections(&mut self) {
        clamp_list_state(&mut self.book_state, self.session.listing().len());
        clamp_list_state(&mut self.reading_state, self.session.reading_list().len());
    }
}

fn clamp_list_state(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(idx) if idx >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

fn update_list_state(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }

    let current = state.selected().unwrap_or(0);
    let step = delta.unsigned_abs();
    let new_index = if delta < 0 {
        current.saturating_sub(step)
    } else {
        (current + step).min(len - 1)
    };
    state.select(Some(new_index));
}
