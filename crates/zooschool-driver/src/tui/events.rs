/*
[INPUT]:  Crossterm key events
[OUTPUT]: DriveApp actions per mode (trip, compose, completion)
[POS]:    TUI key routing
[UPDATE]: 2026-10-16 Route keys for trip steps, messaging and completion
*/

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::InputRequest;

use super::app::{DriveApp, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyOutcome {
    Continue,
    Quit,
}

/// Handles key events for the TUI.
pub(super) async fn handle_key_event(app: &mut DriveApp, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match app.mode {
        Mode::Trip => handle_trip_key(app, key.code),
        Mode::Compose(_) => {
            handle_compose_key(app, key.code);
            KeyOutcome::Continue
        }
        Mode::Complete(_) => {
            handle_completion_key(app, key.code).await;
            KeyOutcome::Continue
        }
        Mode::Done => KeyOutcome::Quit,
    }
}

fn handle_trip_key(app: &mut DriveApp, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm_step(),
        KeyCode::Char('m') => app.open_compose(),
        KeyCode::Char('n') => app.show_navigation(),
        KeyCode::Char('c') => app.show_call_link(),
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_compose_key(app: &mut DriveApp, key: KeyCode) {
    match key {
        KeyCode::Esc => app.close_compose(),
        KeyCode::Enter => app.send_message(),
        KeyCode::Tab => app.cycle_template(true),
        KeyCode::BackTab => app.cycle_template(false),
        other => {
            if let Some(request) = input_request(other) {
                app.edit_input(request);
            }
        }
    }
}

async fn handle_completion_key(app: &mut DriveApp, key: KeyCode) {
    match key {
        KeyCode::Enter => app.submit_completion(false).await,
        KeyCode::Esc => app.submit_completion(true).await,
        KeyCode::Up => app.adjust_rating(true),
        KeyCode::Down => app.adjust_rating(false),
        other => {
            if let Some(request) = input_request(other) {
                app.edit_input(request);
            }
        }
    }
}

fn input_request(key: KeyCode) -> Option<InputRequest> {
    let request = match key {
        KeyCode::Char(ch) => InputRequest::InsertChar(ch),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(request)
}
