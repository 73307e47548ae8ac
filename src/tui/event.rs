//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;
use crate::api::AskRequest;

/// Lines scrolled per PageUp/PageDown.
const PAGE_SCROLL: u16 = 5;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the TUI.
    Quit,
    /// Send this request to the answering service.
    Send(AskRequest),
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Esc` / `Ctrl+C`: Quit
/// - `Enter`: Submit the question
/// - `Ctrl+U`: Clear the question
/// - `Up`/`Down`, `PageUp`/`PageDown`: Scroll the answer
/// - Characters and `Backspace`: Edit the question
///
/// # Examples
///
/// ```
/// use qanda::tui::{App, event::{Action, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::default();
/// let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
/// assert_eq!(handle_key_event(&mut app, key), Action::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Char('u') if ctrl => app.clear_question(),
        KeyCode::Enter => {
            if let Some(request) = app.submit() {
                return Action::Send(request);
            }
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Down => app.scroll_answer_down(1),
        KeyCode::Up => app.scroll_answer_up(1),
        KeyCode::PageDown => app.scroll_answer_down(PAGE_SCROLL),
        KeyCode::PageUp => app.scroll_answer_up(PAGE_SCROLL),
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_char(c);
        }
        _ => {}
    }

    Action::Continue
}
