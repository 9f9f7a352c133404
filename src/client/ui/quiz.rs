//! Quiz screen for the client.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{ClientApp, ClientState, QuizPhase};
use crate::models::Choice;

/// Render the quiz screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let ClientState::Quiz {
        question,
        number,
        selected,
        phase,
    } = &app.state
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Progress
        Constraint::Length(7), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(3), // Feedback / notice
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], *number);
    render_question_text(frame, chunks[1], &question.text);
    render_options(frame, chunks[2], &question.options, *selected, app.can_check());
    render_status(frame, chunks[3], phase, app.notice.as_deref());
    render_controls(frame, chunks[4], app);
}

fn render_progress(frame: &mut Frame, area: Rect, number: usize) {
    let widget = Paragraph::new(format!("Question {}", number))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).bold());

    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String; 4],
    selected: Option<usize>,
    enabled: bool,
) {
    let lines: Vec<Line> = Choice::ALL
        .iter()
        .zip(options.iter())
        .map(|(choice, opt)| {
            let is_selected = selected == Some(choice.index());
            let marker = if is_selected { "(*) " } else { "( ) " };

            let style = match (enabled, is_selected) {
                (false, _) => Style::default().fg(Color::DarkGray),
                (true, true) => Style::default().fg(Color::Yellow).bold(),
                (true, false) => Style::default().fg(Color::White),
            };

            Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{}) ", choice.letter().to_ascii_uppercase()), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, phase: &QuizPhase, notice: Option<&str>) {
    let (text, color) = match (phase, notice) {
        (_, Some(notice)) => (notice.to_string(), Color::Red),
        (QuizPhase::Checked { feedback }, None) if feedback.starts_with("Correct") => {
            (feedback.clone(), Color::Green)
        }
        (QuizPhase::Checked { feedback }, None) => (feedback.clone(), Color::Red),
        (QuizPhase::Submitted, None) => ("Waiting for the server...".to_string(), Color::Yellow),
        (QuizPhase::Answering, None) => (String::new(), Color::Reset),
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let check = if app.can_check() { Color::Gray } else { Color::DarkGray };
    let next = if app.can_next() { Color::Gray } else { Color::DarkGray };

    let line = Line::from(vec![
        Span::styled("j/k or arrows to select  ·  ", Style::default().fg(check)),
        Span::styled("Enter check  ·  ", Style::default().fg(check)),
        Span::styled("n next  ·  ", Style::default().fg(next)),
        Span::styled("q quit", Style::default().fg(Color::Gray)),
    ]);

    let widget = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
