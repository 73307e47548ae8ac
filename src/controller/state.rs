//! State types for the query controller.

/// Input text and the outcome of the last submission.
///
/// `answer` and `error` are never both set once a submission has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub(super) question: String,
    pub(super) pending: bool,
    pub(super) answer: Option<String>,
    pub(super) error: Option<String>,
}

/// What the answer area should show, in render priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// A submission is in flight.
    Pending,
    /// The last submission failed with this message.
    Error(&'a str),
    /// The last submission succeeded with this answer.
    Answer(&'a str),
    /// Nothing submitted yet.
    Idle,
}

impl QueryState {
    /// Returns the current input text.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the answer from the last successful submission.
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Returns the error message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Projects the state onto what should be rendered.
    ///
    /// Pending wins over everything, then error, then answer.
    ///
    /// # Examples
    ///
    /// ```
    /// use qanda::controller::{QueryState, View};
    ///
    /// let state = QueryState::default();
    /// assert_eq!(state.view(), View::Idle);
    /// ```
    pub fn view(&self) -> View<'_> {
        if self.pending {
            View::Pending
        } else if let Some(error) = self.error.as_deref() {
            View::Error(error)
        } else if let Some(answer) = self.answer.as_deref() {
            View::Answer(answer)
        } else {
            View::Idle
        }
    }
}
