//! Status bar widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    has_sensor: bool,
    active: bool,
    pulsing: bool,
    status_message: Option<&str>,
    error_message: Option<&str>,
) {
    let mut spans = vec![];

    // Subscription status
    let (readout_text, readout_color) = match (has_sensor, active) {
        (false, _) => ("NO SENSOR", Color::DarkGray),
        (true, true) => ("LIVE", Color::Green),
        (true, false) => ("PAUSED", Color::Yellow),
    };
    spans.push(Span::styled(
        readout_text,
        Style::default().fg(readout_color).add_modifier(Modifier::BOLD)
    ));

    if pulsing {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "PULSE",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        ));
    }

    // Error message takes priority
    if let Some(error) = error_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("ERROR: {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        ));
    } else if let Some(status) = status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            status,
            Style::default().fg(Color::Gray)
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
