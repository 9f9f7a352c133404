//! Main client UI renderer.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::client::state::{ClientApp, ClientState};

use super::quiz;

/// Render the client UI based on current state.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.state {
        ClientState::Connecting => render_message(
            frame,
            area,
            &format!("Connecting to {}...", app.server_addr),
            Color::Yellow,
            None,
        ),
        ClientState::Waiting => render_message(
            frame,
            area,
            app.notice.as_deref().unwrap_or("Waiting for question..."),
            Color::Yellow,
            Some("Press [Q] to quit"),
        ),
        ClientState::Quiz { .. } => quiz::render(frame, area, app),
        ClientState::Finished { message } => {
            render_message(frame, area, message, Color::Green, Some("Press [Q] to exit"))
        }
        ClientState::Disconnected { message } => {
            render_message(frame, area, message, Color::Red, Some("Press [Q] to exit"))
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color, hint: Option<&str>) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(8),
        Constraint::Percentage(40),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ GAME",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color).bold())),
        Line::from(""),
    ];

    if let Some(hint) = hint {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
