//! Help panel widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn binding(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<9}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(format!("- {}", description)),
    ])
}

/// Render the help panel
pub fn render_help(frame: &mut Frame, area: Rect) {
    // Clear the area first
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(""),
        heading("Buttons"),
        binding("v", "Vibrate"),
        binding("c", "Check connections"),
        Line::from(""),
        heading("System status dialog"),
        binding("Enter/o", "Close"),
        binding("m", "View on map (when a location is known)"),
        Line::from(""),
        heading("Other"),
        binding("?/h/F1", "Toggle this help"),
        binding("q/Esc", "Quit application"),
        Line::from(""),
        heading("Status Indicators"),
        Line::from(vec![
            Span::styled("  LIVE", Style::default().fg(Color::Green)),
            Span::raw("      - Receiving readings"),
        ]),
        Line::from(vec![
            Span::styled("  PAUSED", Style::default().fg(Color::Yellow)),
            Span::raw("    - Terminal unfocused, sensor released"),
        ]),
        Line::from(vec![
            Span::styled("  NO SENSOR", Style::default().fg(Color::DarkGray)),
            Span::raw(" - Device has no accelerometer"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("?", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" to close this help"),
        ]),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
