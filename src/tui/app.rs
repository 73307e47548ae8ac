use crate::api::{AskError, AskRequest};
use crate::controller::{Outcome, QueryController, QueryState, View};

/// Spinner frames cycled while a question is in flight.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Application state for the TUI.
///
/// Wraps the query controller with view-only state: answer scroll offset and
/// spinner animation.
#[derive(Debug, Clone)]
pub struct App {
    controller: QueryController,
    /// Base URL shown in the header
    service_url: String,
    /// Scroll offset for the answer panel
    answer_scroll: u16,
    /// Current spinner frame
    spinner_frame: usize,
}

impl App {
    /// Creates a new App with empty query state.
    ///
    /// # Examples
    ///
    /// ```
    /// use qanda::tui::App;
    ///
    /// let app = App::new("http://127.0.0.1:8000/");
    /// assert_eq!(app.state().question(), "");
    /// assert!(!app.state().is_pending());
    /// ```
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            controller: QueryController::new(),
            service_url: service_url.into(),
            answer_scroll: 0,
            spinner_frame: 0,
        }
    }

    /// Returns the query state.
    pub fn state(&self) -> &QueryState {
        self.controller.state()
    }

    /// Returns what the answer panel should show.
    pub fn view(&self) -> View<'_> {
        self.controller.view()
    }

    /// Returns the base URL of the answering service.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Adds a character to the question. Ignored while pending.
    pub fn push_char(&mut self, c: char) {
        self.controller.push_char(c);
    }

    /// Removes the last character of the question. Ignored while pending.
    pub fn pop_char(&mut self) {
        self.controller.pop_char();
    }

    /// Clears the question. Ignored while pending.
    pub fn clear_question(&mut self) {
        self.controller.clear_question();
    }

    /// Starts a submission, returning the request to send if one should go out.
    pub fn submit(&mut self) -> Option<AskRequest> {
        match self.controller.begin() {
            Ok(request) => {
                self.answer_scroll = 0;
                Some(request)
            }
            Err(reason) => {
                log::debug!("submission skipped: {reason:?}");
                None
            }
        }
    }

    /// Applies the result of the in-flight request.
    ///
    /// The answer scroll only resets when the result was applied; a stray
    /// result leaves the panel where the user left it.
    pub fn finish(&mut self, result: Result<String, AskError>) -> Outcome {
        let outcome = self.controller.complete(result);
        if !matches!(outcome, Outcome::Skipped(_)) {
            self.answer_scroll = 0;
        }
        outcome
    }

    /// Returns the current answer scroll offset.
    pub fn answer_scroll(&self) -> u16 {
        self.answer_scroll
    }

    /// Scrolls the answer panel down by the specified amount.
    pub fn scroll_answer_down(&mut self, amount: u16) {
        self.answer_scroll = self.answer_scroll.saturating_add(amount);
    }

    /// Scrolls the answer panel up by the specified amount.
    pub fn scroll_answer_up(&mut self, amount: u16) {
        self.answer_scroll = self.answer_scroll.saturating_sub(amount);
    }

    /// Advances the spinner while a question is pending.
    pub fn tick(&mut self) {
        if self.state().is_pending() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Returns the current spinner glyph.
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_URL)
    }
}
