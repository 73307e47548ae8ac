//! Terminal User Interface module for qanda.
//!
//! Provides the question form, answer panel and keyboard handling using
//! ratatui for rendering and crossterm for terminal management.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::api::{AskError, AskRequest, AskService};

mod app;
pub mod event;
mod ui;

pub use app::App;
use event::Action;

/// Spinner and redraw cadence while idle.
const TICK_RATE: Duration = Duration::from_millis(100);

type AskResult = Result<String, AskError>;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Must run before exiting the TUI, including on error paths.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before the original hook runs.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Sends `request` on a background task and reports the result on `results`.
///
/// The task never touches `App`; the event loop applies the result.
fn spawn_request(
    service: Arc<dyn AskService>,
    request: AskRequest,
    results: mpsc::UnboundedSender<AskResult>,
) {
    tokio::spawn(async move {
        let result = service.ask(&request).await;
        // A closed channel means the UI has already exited
        let _ = results.send(result);
    });
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
pub async fn run_event_loop(app: &mut App, service: Arc<dyn AskService>) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, service, &mut terminal).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Internal event loop implementation.
///
/// Waits on keyboard input, request results and the tick timer; every state
/// change happens here, between redraws.
async fn run_event_loop_internal(
    app: &mut App,
    service: Arc<dyn AskService>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<AskResult>();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match event::handle_key_event(app, key) {
                        Action::Quit => break,
                        Action::Send(request) => {
                            log::debug!("submitting question ({} chars)", request.question.len());
                            spawn_request(Arc::clone(&service), request, results_tx.clone());
                        }
                        Action::Continue => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => break,
            },
            Some(result) = results_rx.recv() => {
                let outcome = app.finish(result);
                log::debug!("submission finished: {outcome:?}");
            }
            _ = ticker.tick() => app.tick(),
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// # Errors
///
/// Returns an error if terminal initialization or the event loop fails.
pub async fn run(service: Arc<dyn AskService>, service_url: &str) -> Result<()> {
    init_panic_hook();

    let mut app = App::new(service_url);
    run_event_loop(&mut app, service)
        .await
        .context("TUI event loop failed")?;

    Ok(())
}
