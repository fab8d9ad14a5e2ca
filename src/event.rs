//! Event Handling
//!
//! Keyboard and event handling for cloudcate.

use crate::app::{App, Focus, Mode};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Rows moved by page navigation
const PAGE_SIZE: usize = 10;

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        match read()? {
            Event::Key(key) => return Ok(handle_key_event(app, key.code, key.modifiers)),
            Event::Paste(text) if app.mode == Mode::Normal => {
                app.paste(&text);
                app.focus_term();
            },
            _ => {},
        }
    }
    Ok(false)
}

pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        Mode::Normal => match app.focus {
            Focus::Term => handle_term_input(app, code, modifiers),
            Focus::Results => handle_results_mode(app, code, modifiers),
        },
        Mode::TypePicker => handle_type_picker(app, code),
        Mode::Help => handle_help_mode(app, code),
        Mode::Details => handle_details_mode(app, code),
    }
}

/// Alt+Left / Alt+Right walk the location history from anywhere
fn handle_history_keys(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if !modifiers.contains(KeyModifiers::ALT) {
        return false;
    }
    match code {
        KeyCode::Left => {
            app.navigate_back();
            true
        },
        KeyCode::Right => {
            app.navigate_forward();
            true
        },
        _ => false,
    }
}

fn handle_term_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if handle_history_keys(app, code, modifiers) {
        return false;
    }

    match code {
        KeyCode::Enter => app.start_search(),
        KeyCode::Tab => app.enter_type_picker(),
        KeyCode::Down | KeyCode::Esc => app.focus_results(),
        KeyCode::F(1) => app.enter_help_mode(),
        KeyCode::Backspace => app.pop_term_char(),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.clear_term(),
        KeyCode::Char(c)
            if !modifiers.contains(KeyModifiers::CONTROL)
                && !modifiers.contains(KeyModifiers::ALT) =>
        {
            app.push_term_char(c)
        },
        _ => {},
    }
    false
}

fn handle_results_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Double-g goes to top
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return false;
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return false;
    }
    app.last_key_press = None;

    if handle_history_keys(app, code, modifiers) {
        return false;
    }

    match code {
        KeyCode::Char('q') => return true,

        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => {
            if app.selected == 0 {
                app.focus_term();
            } else {
                app.previous();
            }
        },
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(PAGE_SIZE),
        KeyCode::PageUp => app.page_up(PAGE_SIZE),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(PAGE_SIZE)
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.page_up(PAGE_SIZE),

        KeyCode::Enter | KeyCode::Char('d') => app.enter_details_mode(),
        KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Esc => app.focus_term(),
        KeyCode::Tab | KeyCode::Char('t') => app.enter_type_picker(),
        KeyCode::Char('r') => app.start_search(),
        KeyCode::Char('[') => {
            app.navigate_back();
        },
        KeyCode::Char(']') => {
            app.navigate_forward();
        },
        KeyCode::Char('?') | KeyCode::F(1) => app.enter_help_mode(),
        _ => {},
    }
    false
}

fn handle_type_picker(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc => app.exit_mode(),
        KeyCode::Enter => app.apply_picker(),
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.picker_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.picker_previous(),
        _ => {},
    }
    false
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1)
    ) {
        app.exit_mode();
    }
    false
}

fn handle_details_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('d') | KeyCode::Enter => {
            app.exit_mode()
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.details_scroll = app.details_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.details_scroll = app.details_scroll.saturating_sub(1);
        },
        KeyCode::Home => app.details_scroll = 0,
        _ => {},
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SearchClient;
    use crate::config::Config;
    use crate::location::HistoryLocation;

    fn app() -> App {
        let client = SearchClient::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        let location = HistoryLocation::parse("http://localhost:8080/").unwrap();
        App::new(client, location, Config::default())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_edits_term() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.query.term, "q");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        assert!(handle_key_event(
            &mut app,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        ));
    }

    #[test]
    fn test_enter_with_blank_term_is_inert() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert!(!app.controller.is_loading());
    }

    #[test]
    fn test_alt_left_navigates_back() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        handle_key_event(&mut app, KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(app.query.term, "a");
        handle_key_event(&mut app, KeyCode::Right, KeyModifiers::ALT);
        assert_eq!(app.query.term, "ab");
    }

    #[test]
    fn test_type_picker_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, Mode::TypePicker);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.query.resource_type, "s3");
    }

    #[test]
    fn test_help_closes() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
    }
}
