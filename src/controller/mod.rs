//! Question submission state machine.
//!
//! This module provides `QueryController`, which owns the `QueryState` shown by the
//! front-ends and drives one submission at a time through the answering service.

mod query_controller;
mod state;

pub use query_controller::{Outcome, QueryController, SkipReason};
pub use state::{QueryState, View};
