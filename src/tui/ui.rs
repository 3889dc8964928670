use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, Paragraph, Wrap},
};

use crate::models::{Book, BookId};
use crate::rating::{MAX_RATING, RatingControl, render_stars};
use crate::session::Listing;

use super::hit::Target;
use super::{App, state::FocusArea};

pub const NO_MATCHES_MESSAGE: &str = "No books/authors found matching your search.";

const ADD_LABEL: &str = "[Add to Reading List]";
const BACK_LABEL: &str = "[Back]";
const DELETE_LABEL: &str = "[x]";
const RATING_LABEL: &str = "Rating: ";
const HIGHLIGHT_SYMBOL: &str = "▶ ";
const HIGHLIGHT_WIDTH: u16 = 2;
const BOOK_ROW_HEIGHT: u16 = 4;
const STAR_GAP: u16 = 2;
const ELLIPSIS: char = '…';

pub fn draw(frame: &mut Frame, app: &mut App) {
    app.hits.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_search(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    if app.session.is_detail_open() {
        draw_detail(frame, app, body[0]);
    } else {
        draw_book_list(frame, app, body[0]);
    }
    draw_reading_list(frame, app, body[1]);

    draw_footer(frame, app, chunks[2]);
}

fn draw_search(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Search title or author")
        .borders(Borders::ALL)
        .border_style(border_style(app.focus, FocusArea::Search));

    let paragraph = Paragraph::new(format!("> {}", app.session.query())).block(block);

    frame.render_widget(paragraph, area);
    app.hits.register(area, Target::SearchBar);
}

fn draw_book_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Books")
        .borders(Borders::ALL)
        .border_style(border_style(app.focus, FocusArea::Books));
    let inner = block.inner(area);

    let ids = match app.session.listing() {
        Listing::NoMatches => {
            let banner = Paragraph::new(NO_MATCHES_MESSAGE)
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(banner, area);
            return;
        }
        Listing::Books(ids) => ids.clone(),
    };

    let rows: Vec<&Book> = match app.session.catalog() {
        Some(catalog) => ids.iter().filter_map(|id| catalog.get(id)).collect(),
        None => Vec::new(),
    };
    let items: Vec<ListItem> = rows
        .iter()
        .map(|book| ListItem::new(book_lines(book)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut app.book_state);

    let offset = app.book_state.offset();
    for (visible, id) in ids.iter().skip(offset).enumerate() {
        let y = inner.y + visible as u16 * BOOK_ROW_HEIGHT;
        if y + BOOK_ROW_HEIGHT > inner.bottom() {
            break;
        }
        register_book_row(app, inner, y, id);
    }
}

fn register_book_row(app: &mut App, inner: Rect, y: u16, id: &BookId) {
    let row = Rect::new(inner.x, y, inner.width, BOOK_ROW_HEIGHT);
    app.hits.register(row, Target::BookRow(id.clone()));

    let content_x = inner.x + HIGHLIGHT_WIDTH;
    let stars_y = y + BOOK_ROW_HEIGHT - 1;
    register_stars(app, inner, content_x, stars_y, id);

    let button_x = content_x + u16::from(MAX_RATING) + STAR_GAP;
    app.hits.register(
        Rect::new(button_x, stars_y, label_width(ADD_LABEL), 1).intersection(inner),
        Target::AddButton(id.clone()),
    );
}

fn register_stars(app: &mut App, bounds: Rect, x: u16, y: u16, id: &BookId) {
    for star in 1..=MAX_RATING {
        let cell = Rect::new(x + u16::from(star - 1), y, 1, 1).intersection(bounds);
        app.hits.register(cell, Target::Star { book: id.clone(), star });
    }
}

fn draw_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(book) = app.session.selected().cloned() else {
        return;
    };
    let control = RatingControl::bind(book.id.clone());
    let stars = app
        .session
        .catalog()
        .map(|catalog| control.stars(catalog))
        .unwrap_or_default();

    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(border_style(app.focus, FocusArea::Books));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Author: {}", book.author)),
        Line::from(format!("Image: {}", book.image)).style(dim_style()),
        Line::from(""),
        Line::from(vec![
            Span::raw(RATING_LABEL),
            Span::styled(stars, star_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(BACK_LABEL, button_style()),
            Span::raw("  "),
            Span::styled(ADD_LABEL, button_style()),
        ]),
        Line::from(""),
    ];
    let header_height = (header.len() as u16).min(inner.height);
    let header_area = Rect::new(inner.x, inner.y, inner.width, header_height);
    frame.render_widget(Paragraph::new(header), header_area);

    let description_area = Rect::new(
        inner.x,
        inner.y + header_height,
        inner.width,
        inner.height - header_height,
    );
    frame.render_widget(
        Paragraph::new(book.description.clone()).wrap(Wrap { trim: true }),
        description_area,
    );

    register_stars(
        app,
        header_area,
        inner.x + label_width(RATING_LABEL),
        inner.y + 4,
        control.book(),
    );

    let buttons_y = inner.y + 6;
    let back = Rect::new(inner.x, buttons_y, label_width(BACK_LABEL), 1);
    let add = Rect::new(
        inner.x + label_width(BACK_LABEL) + 2,
        buttons_y,
        label_width(ADD_LABEL),
        1,
    );
    app.hits.register(back.intersection(header_area), Target::BackButton);
    app.hits.register(add.intersection(header_area), Target::DetailAddButton);
}

fn draw_reading_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Reading List")
        .borders(Borders::ALL)
        .border_style(border_style(app.focus, FocusArea::ReadingList));
    let inner = block.inner(area);

    let titles: Vec<String> = match app.session.catalog() {
        Some(catalog) => app
            .session
            .reading_list()
            .books(catalog)
            .map(|book| book.title.clone())
            .collect(),
        None => Vec::new(),
    };
    // Room left for the title once the highlight column and " [x]" are placed.
    let title_width = inner
        .width
        .saturating_sub(HIGHLIGHT_WIDTH + 1 + label_width(DELETE_LABEL));
    let shown: Vec<String> = titles
        .iter()
        .map(|title| fit_title(title, title_width))
        .collect();

    let items: Vec<ListItem> = if app.session.reading_list().is_empty() {
        vec![ListItem::new("Reading list is empty").style(dim_style())]
    } else {
        shown
            .iter()
            .map(|title| {
                ListItem::new(Line::from(vec![
                    Span::raw(title.clone()),
                    Span::raw(" "),
                    Span::styled(DELETE_LABEL, Style::default().fg(Color::Red)),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut app.reading_state);

    let offset = app.reading_state.offset();
    for (index, title) in titles.iter().enumerate().skip(offset) {
        let y = inner.y + (index - offset) as u16;
        if y >= inner.bottom() {
            break;
        }
        app.hits.register(
            Rect::new(inner.x, y, inner.width, 1),
            Target::ReadingRow(index),
        );
        let delete_x = (inner.x + HIGHLIGHT_WIDTH)
            .saturating_add(label_width(&shown[index]))
            .saturating_add(1);
        app.hits.register(
            Rect::new(delete_x, y, label_width(DELETE_LABEL), 1).intersection(inner),
            Target::DeleteButton {
                index,
                title: title.clone(),
            },
        );
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut text = String::from(
        "Tab: cycle • Enter: details • a: add • 1-5: rate • d: remove • Esc: back • q: quit",
    );
    if let (Some(catalog), Some(loaded_at)) = (app.session.catalog(), app.loaded_at) {
        text.push_str(&format!(
            "  |  {} books loaded at {}",
            catalog.len(),
            loaded_at.format("%H:%M:%S")
        ));
    }

    let footer = Paragraph::new(text).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, area);
}

fn book_lines(book: &Book) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Image: {}", book.image)).style(dim_style()),
        Line::from(format!("Author: {}", book.author)),
        Line::from(vec![
            Span::styled(render_stars(book.rate), star_style()),
            Span::raw(" ".repeat(STAR_GAP as usize)),
            Span::styled(ADD_LABEL, button_style()),
        ]),
    ]
}

/// Shortens `title` to at most `max` columns, ending in an ellipsis when cut.
fn fit_title(title: &str, max: u16) -> String {
    if label_width(title) <= max {
        return title.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut fitted = String::new();
    let mut used = 0;
    for ch in title.chars() {
        let width = label_width(ch.encode_utf8(&mut [0; 4]));
        if used + width + 1 > max {
            break;
        }
        fitted.push(ch);
        used += width;
    }
    fitted.push(ELLIPSIS);
    fitted
}

fn label_width(text: &str) -> u16 {
    Span::raw(text).width().min(u16::MAX as usize) as u16
}

fn border_style(current: FocusArea, area: FocusArea) -> Style {
    if current == area {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn star_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn button_style() -> Style {
    Style::default().fg(Color::Green)
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::api::catalog::CatalogClient;
    use crate::app::AppMessage;
    use crate::config::AppConfig;
    use crate::rating::Rating;
    use crate::session::Command;
    use crate::tui::AppController;

    fn app_with(books: Vec<Book>) -> App {
        let config = AppConfig::with_overrides(Some("unused.json".into()), None).unwrap();
        let client = CatalogClient::new(&config).unwrap();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut app = App::new(AppController::new(client, tx), rx);
        app.handle_message(AppMessage::CatalogLoaded(books));
        app
    }

    fn dune() -> Book {
        Book {
            id: BookId::new("1"),
            title: "Dune".into(),
            author: "Herbert".into(),
            image: "dune.jpg".into(),
            description: "Spice and sand.".into(),
            rate: Rating::new(3),
        }
    }

    fn render(app: &mut App) -> String {
        render_sized(app, 100, 30)
    }

    fn render_sized(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer.get(x, y).symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[test]
    fn list_row_shows_stars_for_rate() {
        let mut app = app_with(vec![dune()]);
        let screen = render(&mut app);

        assert!(screen.contains("Dune"));
        assert!(screen.contains("Author: Herbert"));
        assert!(screen.contains("★★★☆☆"));
        assert!(screen.contains(ADD_LABEL));
    }

    #[test]
    fn no_matches_replaces_list_with_banner() {
        let mut app = app_with(vec![dune()]);
        for ch in "xyz123".chars() {
            app.push_search_char(ch);
        }
        let screen = render(&mut app);

        assert!(screen.contains(NO_MATCHES_MESSAGE));
        assert!(!screen.contains("★★★☆☆"));
    }

    #[test]
    fn clicking_current_star_redraws_one_less() {
        let mut app = app_with(vec![dune()]);
        render(&mut app);

        let star = Target::Star { book: BookId::new("1"), star: 3 };
        let cell = app.hits.area_of(&star).unwrap();
        app.handle_click(cell.x, cell.y);

        assert!(!app.session.is_detail_open());
        assert!(render(&mut app).contains("★★☆☆☆"));
    }

    #[test]
    fn clicking_row_opens_detail_and_back_returns() {
        let mut app = app_with(vec![dune()]);
        render(&mut app);

        let row = app.hits.area_of(&Target::BookRow(BookId::new("1"))).unwrap();
        app.handle_click(row.x + 4, row.y);
        let screen = render(&mut app);
        assert!(screen.contains("Details"));
        assert!(screen.contains("Spice and sand."));

        let back = app.hits.area_of(&Target::BackButton).unwrap();
        app.handle_click(back.x, back.y);
        assert!(!app.session.is_detail_open());
        assert!(render(&mut app).contains("Author: Herbert"));
    }

    #[test]
    fn detail_stars_and_add_button_are_bound_to_selected_book() {
        let mut app = app_with(vec![dune()]);
        app.dispatch(Command::OpenDetail(BookId::new("1")));
        render(&mut app);

        let star = app
            .hits
            .area_of(&Target::Star { book: BookId::new("1"), star: 5 })
            .unwrap();
        app.handle_click(star.x, star.y);
        let add = app.hits.area_of(&Target::DetailAddButton).unwrap();
        app.handle_click(add.x, add.y);

        let screen = render(&mut app);
        assert!(screen.contains("★★★★★"));
        assert_eq!(app.session.reading_list().len(), 1);
    }

    #[test]
    fn delete_control_removes_reading_list_row() {
        let mut app = app_with(vec![dune()]);
        app.dispatch(Command::AddToReadingList(BookId::new("1")));
        assert!(render(&mut app).contains("Dune [x]"));

        let delete = app
            .hits
            .area_of(&Target::DeleteButton { index: 0, title: "Dune".into() })
            .unwrap();
        app.handle_click(delete.x + 1, delete.y);

        assert!(app.session.reading_list().is_empty());
        assert!(render(&mut app).contains("Reading list is empty"));
    }

    #[test]
    fn long_reading_list_title_keeps_delete_control_visible() {
        let title = "The Hitchhiker's Guide to the Galaxy";
        let mut app = app_with(vec![Book {
            id: BookId::new("42"),
            title: title.into(),
            author: "Adams".into(),
            image: String::new(),
            description: String::new(),
            rate: Rating::new(5),
        }]);
        app.dispatch(Command::AddToReadingList(BookId::new("42")));

        let screen = render_sized(&mut app, 80, 24);
        assert!(screen.contains("The Hitchhiker"));
        assert!(screen.contains("… [x]"));
        assert!(!screen.contains("Galaxy"));

        let delete = app
            .hits
            .area_of(&Target::DeleteButton { index: 0, title: title.into() })
            .unwrap();
        assert_eq!(delete.width, label_width(DELETE_LABEL));
        app.handle_click(delete.x, delete.y);

        assert!(app.session.reading_list().is_empty());
    }

    #[test]
    fn titles_are_cut_with_ellipsis_only_when_too_wide() {
        assert_eq!(fit_title("Dune", 20), "Dune");
        assert_eq!(fit_title("Dune", 4), "Dune");
        assert_eq!(fit_title("Dune", 3), "Du…");
        assert_eq!(fit_title("Dune", 0), "");
    }
}
