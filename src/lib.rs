pub mod api;
pub mod config;
pub mod controller;
pub mod logging;
pub mod tui;

pub use api::{AskClient, AskClientBuilder, AskError, AskRequest, AskService};
pub use config::{Config, ConfigError};
pub use controller::{Outcome, QueryController, QueryState, SkipReason, View};
