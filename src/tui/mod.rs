pub mod app;
pub mod event;
pub mod ternary;
pub mod theme;
pub mod ui;

pub use app::{App, InputMode, View};
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Run the full-screen viewer until the user quits.
///
/// Log output is held back while the terminal is in raw mode and replayed
/// afterwards, whether the loop ended cleanly or not.
pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    crate::logging::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let events = EventHandler::new(250);

    let result = (|| -> anyhow::Result<()> {
        while !app.should_quit {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;

            match events.next()? {
                Event::Key(key) => handle_key_event(&mut app, key),
                Event::Tick => app.update_flash(),
            }
        }
        Ok(())
    })();

    ratatui::restore();
    crate::logging::replay();
    result
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Help => app.input_mode = InputMode::Normal,
        InputMode::ProjectPicker => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.picker_next(),
            KeyCode::Char('k') | KeyCode::Up => app.picker_previous(),
            KeyCode::Enter => app.confirm_picker(),
            KeyCode::Esc | KeyCode::Char('q') => app.close_picker(),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            KeyCode::Tab => app.next_view(),
            KeyCode::BackTab => app.previous_view(),
            KeyCode::Char('1') => app.set_view(View::Summary),
            KeyCode::Char('2') => app.set_view(View::Ternary),
            KeyCode::Char('3') => app.set_view(View::Detail),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Char('s') => app.cycle_sort(),
            KeyCode::Char('r') => app.reload(),
            KeyCode::Char('p') => app.open_picker(),
            KeyCode::Char('?') => app.input_mode = InputMode::Help,
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProjectStore;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        store.create_project("demo", "").unwrap();
        let app = App::new(store, Some("demo".to_string()), ThemeColors::dark());
        (dir, app)
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let (_dir, mut app) = self::app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_view_keys() {
        let (_dir, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Detail);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Summary);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Detail);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (_dir, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.input_mode, InputMode::Help);
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_picker_keys() {
        let (_dir, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.input_mode, InputMode::ProjectPicker);
        // Esc with a project loaded returns to the tables instead of quitting
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);

        handle_key_event(&mut app, key(KeyCode::Char('p')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.project.as_deref(), Some("demo"));
    }

    #[test]
    fn test_sort_key() {
        let (_dir, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.sort.to_string(), "performance");
    }
}
