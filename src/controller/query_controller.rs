//! Query controller implementation.

use crate::api::{AskError, AskRequest, AskService};

use super::state::{QueryState, View};

/// Why a submission (or completion) did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The question is empty or whitespace-only.
    EmptyQuestion,
    /// Another submission is still in flight.
    AlreadyPending,
    /// A completion arrived with no submission in flight.
    NotPending,
}

/// Terminal result of one call to `submit` or `complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was sent and the state is unchanged.
    Skipped(SkipReason),
    /// The answer was stored.
    Answered,
    /// An error message was stored.
    Failed,
}

/// Owns `QueryState` and is its only writer.
///
/// A submission is either driven end to end with [`submit`](Self::submit), or in
/// two halves with [`begin`](Self::begin) and [`complete`](Self::complete) when the
/// caller runs the request itself (the TUI does this to keep rendering while it waits).
#[derive(Debug, Clone, Default)]
pub struct QueryController {
    state: QueryState,
    context: Option<String>,
}

impl QueryController {
    /// Creates a controller with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller that attaches `context` to every request.
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            state: QueryState::default(),
            context: Some(context.into()),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Returns what the answer area should show.
    pub fn view(&self) -> View<'_> {
        self.state.view()
    }

    /// Replaces the question text. Refused while a submission is pending.
    pub fn set_question(&mut self, text: impl Into<String>) -> bool {
        if self.state.pending {
            return false;
        }
        self.state.question = text.into();
        true
    }

    /// Appends a character to the question. Refused while a submission is pending.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.state.pending {
            return false;
        }
        self.state.question.push(c);
        true
    }

    /// Removes the last character of the question. Refused while a submission is pending.
    pub fn pop_char(&mut self) -> bool {
        if self.state.pending {
            return false;
        }
        self.state.question.pop();
        true
    }

    /// Clears the question text. Refused while a submission is pending.
    pub fn clear_question(&mut self) -> bool {
        self.set_question(String::new())
    }

    /// Starts a submission.
    ///
    /// On success the controller is pending, the previous answer and error are
    /// cleared, and the request to send is returned. The question is sent as
    /// typed; trimming is only used for the emptiness check.
    ///
    /// # Errors
    ///
    /// Returns the skip reason, leaving the state untouched, if the question is
    /// blank or a submission is already pending.
    pub fn begin(&mut self) -> Result<AskRequest, SkipReason> {
        if self.state.pending {
            return Err(SkipReason::AlreadyPending);
        }
        if self.state.question.trim().is_empty() {
            return Err(SkipReason::EmptyQuestion);
        }

        self.state.pending = true;
        self.state.answer = None;
        self.state.error = None;

        let request = AskRequest::new(self.state.question.clone());
        Ok(match &self.context {
            Some(context) => request.with_context(context.clone()),
            None => request,
        })
    }

    /// Finishes the in-flight submission with the service result.
    ///
    /// Clears the pending flag and stores either the answer or the error
    /// message. A result that arrives with nothing pending is dropped.
    pub fn complete(&mut self, result: Result<String, AskError>) -> Outcome {
        if !self.state.pending {
            log::warn!("dropping answering service result: no submission in flight");
            return Outcome::Skipped(SkipReason::NotPending);
        }
        self.state.pending = false;

        match result {
            Ok(answer) => {
                log::info!("question answered ({} chars)", answer.len());
                self.state.answer = Some(answer);
                Outcome::Answered
            }
            Err(error) => {
                match &error {
                    AskError::Server { status, message } => {
                        log::info!("answering service rejected question ({status}): {message}");
                    }
                    other => log::warn!("question submission failed: {other}"),
                }
                self.state.error = Some(error.user_message());
                Outcome::Failed
            }
        }
    }

    /// Submits the current question and waits for the outcome.
    pub async fn submit(&mut self, service: &dyn AskService) -> Outcome {
        let request = match self.begin() {
            Ok(request) => request,
            Err(reason) => {
                log::debug!("submission skipped: {reason:?}");
                return Outcome::Skipped(reason);
            }
        };

        let result = service.ask(&request).await;
        self.complete(result)
    }
}
