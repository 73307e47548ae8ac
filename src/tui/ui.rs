//! UI rendering functions for the TUI.
//!
//! Lays out the header, question input, submit hint, answer panel and
//! shortcut bar using ratatui widgets.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::App;
use crate::controller::View;

const TITLE: &str = "AI Q&A";
const TAGLINE: &str = "Your intelligent assistant. Ask anything, get answers.";
const PLACEHOLDER: &str = "e.g., What is the capital of France?";
const IDLE_HINT: &str = "Your answer will appear here.";

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Question input
            Constraint::Length(1), // Submit hint
            Constraint::Min(3),    // Answer panel
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_question_input(frame, app, chunks[1]);
    render_submit_hint(frame, app, chunks[2]);
    render_answer(frame, app, chunks[3]);
    render_shortcut_bar(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            app.service_url().to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ]);

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

/// Renders the question input. Greyed out while a question is pending.
fn render_question_input(frame: &mut Frame, app: &App, area: Rect) {
    let pending = app.state().is_pending();
    let question = app.state().question();

    let border_style = if pending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Ask a Question")
        .border_style(border_style);

    let content = if question.is_empty() && !pending {
        Line::from(vec![
            Span::raw("█"),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else if pending {
        Line::from(Span::styled(
            question.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(format!("{question}█"))
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_submit_hint(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.state().is_pending() {
        Line::from(vec![
            Span::styled(app.spinner(), Style::default().fg(Color::Yellow)),
            Span::raw(" Asking AI..."),
        ])
    } else {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(": Submit"),
        ])
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Builds the answer panel content for the current view.
fn answer_text(app: &App) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    match app.view() {
        View::Pending => Text::from(Line::from(vec![
            Span::styled(app.spinner(), Style::default().fg(Color::Yellow)),
            Span::raw(" Thinking..."),
        ])),
        View::Error(message) => Text::from(vec![
            Line::from(Span::styled("An Error Occurred", bold.fg(Color::Red))),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::LightRed),
            )),
        ]),
        View::Answer(answer) => {
            let mut text = Text::from(Line::from(Span::styled("Answer:", bold)));
            text.lines
                .extend(answer.lines().map(|line| Line::from(line.to_string())));
            text
        }
        View::Idle => Text::from(Line::from(Span::styled(
            IDLE_HINT,
            Style::default().fg(Color::DarkGray),
        ))),
    }
}

fn render_answer(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = match app.view() {
        View::Error(_) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Answer")
        .border_style(border_style);

    let alignment = match app.view() {
        View::Answer(_) => Alignment::Left,
        _ => Alignment::Center,
    };

    let paragraph = Paragraph::new(answer_text(app))
        .block(block)
        .alignment(alignment)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let spans = vec![
        Span::styled("Enter", key_style),
        Span::raw(": submit"),
        Span::styled(" | ", sep_style),
        Span::styled("Ctrl+U", key_style),
        Span::raw(": clear"),
        Span::styled(" | ", sep_style),
        Span::styled("PgUp/PgDn", key_style),
        Span::raw(": scroll"),
        Span::styled(" | ", sep_style),
        Span::styled("Esc", key_style),
        Span::raw(": quit"),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AskError;
    use ratatui::{Terminal, backend::TestBackend};

    /// Renders the app into an in-memory terminal and returns the screen text.
    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    fn app_with_question(question: &str) -> App {
        let mut app = App::default();
        for c in question.chars() {
            app.push_char(c);
        }
        app
    }

    #[test]
    fn idle_screen_shows_placeholder_and_hint() {
        let screen = render(&App::default());

        assert!(screen.contains(TITLE));
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains(IDLE_HINT));
        assert!(screen.contains("Submit"));
    }

    #[test]
    fn typed_question_replaces_placeholder() {
        let screen = render(&app_with_question("Who are you?"));

        assert!(screen.contains("Who are you?"));
        assert!(!screen.contains(PLACEHOLDER));
    }

    #[test]
    fn pending_screen_shows_thinking() {
        let mut app = app_with_question("Who are you?");
        app.submit();

        let screen = render(&app);

        assert!(screen.contains("Thinking..."));
        assert!(screen.contains("Asking AI..."));
        assert!(!screen.contains(IDLE_HINT));
    }

    #[test]
    fn error_screen_shows_message() {
        let mut app = app_with_question("Who are you?");
        app.submit();
        app.finish(Err(AskError::Server {
            status: 400,
            message: "bad question".to_string(),
        }));

        let screen = render(&app);

        assert!(screen.contains("An Error Occurred"));
        assert!(screen.contains("bad question"));
    }

    #[test]
    fn answer_screen_shows_answer() {
        let mut app = app_with_question("Capital of France?");
        app.submit();
        app.finish(Ok("Paris".to_string()));

        let screen = render(&app);

        assert!(screen.contains("Answer:"));
        assert!(screen.contains("Paris"));
    }

    #[test]
    fn multi_line_answer_keeps_its_lines() {
        let mut app = app_with_question("List two");
        app.submit();
        app.finish(Ok("first line\nsecond line".to_string()));

        let text = answer_text(&app);

        assert_eq!(text.lines.len(), 3);
    }
}
