use ratatui::layout::Rect;

use crate::models::BookId;
use crate::session::Command;

/// Something the user can click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    SearchBar,
    BookRow(BookId),
    AddButton(BookId),
    Star { book: BookId, star: u8 },
    BackButton,
    DetailAddButton,
    ReadingRow(usize),
    DeleteButton { index: usize, title: String },
}

impl Target {
    /// The command a click on this target issues, if any. Focus-only targets
    /// return `None`.
    pub fn command(&self) -> Option<Command> {
        match self {
            Target::BookRow(id) => Some(Command::OpenDetail(id.clone())),
            Target::AddButton(id) => Some(Command::AddToReadingList(id.clone())),
            Target::Star { book, star } => Some(Command::ClickStar {
                book: book.clone(),
                star: *star,
            }),
            Target::BackButton => Some(Command::Back),
            Target::DetailAddButton => Some(Command::AddSelectedToReadingList),
            Target::DeleteButton { title, .. } => {
                Some(Command::RemoveFromReadingList(title.clone()))
            }
            Target::SearchBar | Target::ReadingRow(_) => None,
        }
    }
}

/// Clickable regions of the last drawn frame. Rebuilt on every draw and
/// consulted by a single mouse handler, so no region outlives its frame.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Registers `target` over `area`. Register containers before their
    /// children: the last registered region under the cursor wins.
    pub fn register(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<&Target> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| contains(*area, column, row))
            .map(|(_, target)| target)
    }

    #[cfg(test)]
    pub fn area_of(&self, target: &Target) -> Option<Rect> {
        self.regions
            .iter()
            .rev()
            .find(|(_, candidate)| candidate == target)
            .map(|(area, _)| *area)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
