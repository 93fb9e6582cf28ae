//! "System status" dialog with the connectivity report.

use crate::platform::connectivity::{ConnectivityReport, REPORT_TITLE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the connectivity dialog
pub fn render_dialog(frame: &mut Frame, area: Rect, report: &ConnectivityReport) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", REPORT_TITLE))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let mut lines: Vec<Line> = report
        .message()
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut buttons = vec![Span::styled("[Enter] ", key_style), Span::raw("OK")];
    if report.location().is_some() {
        buttons.push(Span::raw("   "));
        buttons.push(Span::styled("[m] ", key_style));
        buttons.push(Span::raw("🗺️ View on map"));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(buttons));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Rows needed to show the report with its border and buttons
pub fn dialog_height(report: &ConnectivityReport) -> u16 {
    report.message().lines().count() as u16 + 4
}
