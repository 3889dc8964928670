mod controller;
mod hit;
mod state;
mod ui;

use std::io::{self, Stdout, Write};
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::interval;
use tracing::warn;

use crate::session::Command;

pub use controller::AppController;
pub use state::{App, FocusArea};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(mut app: App) -> Result<()> {
    app.bootstrap();
    install_panic_hook();

    let outcome = match setup_terminal() {
        Ok(mut terminal) => event_loop(&mut terminal, &mut app).await,
        Err(err) => Err(err),
    };

    let restored = restore_terminal(&mut io::stdout());
    outcome.and(restored)
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Undoes everything `setup_terminal` may have done. Every step runs even
/// when an earlier one fails; the first error is reported.
fn restore_terminal(out: &mut impl Write) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(out, DisableMouseCapture, LeaveAlternateScreen, cursor::Show)
        .context("Failed to leave alternate screen");
    raw.and(screen)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(&mut io::stdout());
        default_hook(info);
    }));
}

async fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut reader = EventStream::new();
    let mut ticker = interval(Duration::from_millis(200));

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            _ = ticker.tick() => {},
            maybe_event = reader.next() => handle_input(app, maybe_event),
            Some(message) = app.msg_rx.recv() => {
                app.handle_message(message);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_input(app: &mut App, maybe_event: Option<io::Result<Event>>) {
    match maybe_event {
        Some(Ok(event)) => handle_event(app, event),
        Some(Err(err)) => warn!("Error reading terminal input: {err}"),
        None => {
            warn!("terminal input closed, quitting");
            app.should_quit = true;
        }
    }
}

fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(app, key_event)
        }
        Event::Mouse(mouse_event) => handle_mouse_event(app, mouse_event),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.handle_click(mouse.column, mouse.row);
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') if app.focus != FocusArea::Search => {
            app.should_quit = true;
        }
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.previous_focus(),
        _ => match app.focus {
            FocusArea::Search => handle_search_keys(app, key),
            FocusArea::Books if app.session.is_detail_open() => handle_detail_keys(app, key),
            FocusArea::Books => handle_book_list_keys(app, key),
            FocusArea::ReadingList => handle_reading_list_keys(app, key),
        },
    }
}

fn handle_search_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Enter | KeyCode::Down => app.focus = FocusArea::Books,
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::ALT)
                && !key.modifiers.contains(KeyModifiers::CONTROL)
            {
                app.push_search_char(ch);
            }
        }
        _ => {}
    }
}

fn handle_book_list_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_book_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_book_selection(1),
        KeyCode::Enter => {
            if let Some(id) = app.highlighted_book() {
                app.dispatch(Command::OpenDetail(id));
            }
        }
        KeyCode::Char('a') => {
            if let Some(id) = app.highlighted_book() {
                app.dispatch(Command::AddToReadingList(id));
            }
        }
        KeyCode::Char(ch) => rate_with_key(app, ch),
        _ => {}
    }
}

fn handle_detail_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.dispatch(Command::Back),
        KeyCode::Char('a') => app.dispatch(Command::AddSelectedToReadingList),
        KeyCode::Char(ch) => rate_with_key(app, ch),
        _ => {}
    }
}

fn handle_reading_list_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_reading_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_reading_selection(1),
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(title) = app.highlighted_reading_title() {
                app.dispatch(Command::RemoveFromReadingList(title));
            }
        }
        _ => {}
    }
}

/// Digits 1-5 act as clicks on the matching star.
fn rate_with_key(app: &mut App, ch: char) {
    let Some(star) = ch.to_digit(10).and_then(|d| u8::try_from(d).ok()) else {
        return;
    };
    if !(1..=5).contains(&star) {
        return;
    }
    if let Some(book) = app.rating_target() {
        app.dispatch(Command::ClickStar { book, star });
    }
}
