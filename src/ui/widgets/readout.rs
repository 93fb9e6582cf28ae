//! Readout panel showing the latest accelerometer reading.

use crate::ui::app::ReadoutPanel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Cells on each side of the zero mark; one cell per m/s², so about two g either way
const HALF_WIDTH: usize = 20;

/// Render the readout panel
pub fn render_readout(
    frame: &mut Frame,
    area: Rect,
    panel: &ReadoutPanel,
    sensor_name: Option<&str>,
    active: bool,
) {
    let title = match sensor_name {
        Some(name) => format!(" Accelerometer: {} ", name),
        None => " Accelerometer ".to_string(),
    };
    let border = if active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let Some(sample) = panel.latest() else {
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(panel.text())])
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            panel.text(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (label, value) in [("X", sample.x), ("Y", sample.y), ("Z", sample.z)] {
        let mut spans = vec![Span::raw(format!("{}: {:>4} ", label, value))];
        spans.extend(axis_bar(value));
        lines.push(Line::from(spans));
    }

    if let Some(updated) = panel.updated_at() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "updated {} · {} samples",
                updated.format("%H:%M:%S%.3f"),
                panel.samples_seen()
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Green up to about one g, yellow past it, red from 15 m/s²
fn axis_style(magnitude: usize) -> Style {
    let color = match magnitude {
        0..10 => Color::Green,
        10..15 => Color::Yellow,
        _ => Color::Red,
    };
    Style::default().fg(color)
}

/// Fixed-width bar around a zero mark. Negative readings grow left, positive
/// right; anything past `HALF_WIDTH` is clipped.
fn axis_bar(value: i32) -> Vec<Span<'static>> {
    let magnitude = value.unsigned_abs() as usize;
    let filled = magnitude.min(HALF_WIDTH);
    let fill = Span::styled("█".repeat(filled), axis_style(magnitude));
    let zero = Span::styled("│", Style::default().fg(Color::White));

    let pad = Span::raw(" ".repeat(HALF_WIDTH - filled));
    let empty = Span::raw(" ".repeat(HALF_WIDTH));
    if value < 0 {
        vec![pad, fill, zero, empty]
    } else {
        vec![empty, zero, fill, pad]
    }
}
