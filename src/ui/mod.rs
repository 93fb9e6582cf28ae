//! Terminal UI module using ratatui.
//!
//! One screen: the live readout, two buttons (vibrate, check connections), a status
//! bar, the help overlay and the "System status" dialog. Terminal focus is the
//! visibility lifecycle that drives the readout subscription.

pub mod app;
pub mod input;
pub mod widgets;

pub use app::{App, ReadoutPanel};
pub use input::{map_event, InputAction};

use crate::config::AppConfig;
use crate::error::{Result, UiError};
use crate::platform::Capabilities;
use crate::readout::{ReadoutStream, SensorProvider};
use crossterm::event::{DisableFocusChange, EnableFocusChange, EventStream};
use futures_util::StreamExt;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run the interactive screen until the user quits or `shutdown` is cancelled
pub async fn run_interactive<P: SensorProvider>(
    config: &AppConfig,
    provider: P,
    capabilities: Capabilities,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut stream = ReadoutStream::new(provider, ReadoutPanel::default());
    let mut app = App::new(
        stream.sensor().map(|sensor| sensor.name.clone()),
        capabilities,
        Duration::from_millis(config.haptics.pulse_ms),
        config.map.label.clone(),
    );

    let mut terminal =
        ratatui::try_init().map_err(|e| UiError::InitializationError(e.to_string()))?;
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableFocusChange) {
        tracing::debug!(error = %e, "focus reporting unavailable");
    }

    let tick = Duration::from_millis(config.service.tick_ms);
    let result = event_loop(&mut terminal, &mut app, &mut stream, tick, &shutdown).await;

    // Release the sensor before handing the terminal back
    app.hide(&mut stream);
    if let Err(e) = crossterm::execute!(std::io::stdout(), DisableFocusChange) {
        tracing::debug!(error = %e, "failed to disable focus reporting");
    }
    ratatui::restore();
    result
}

async fn event_loop<P: SensorProvider>(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    stream: &mut ReadoutStream<P, ReadoutPanel>,
    tick: Duration,
    shutdown: &CancellationToken,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    app.handle(InputAction::Shown, stream).await;

    while !app.should_quit {
        terminal
            .draw(|frame| draw(frame, app, stream.sink(), stream.is_active()))
            .map_err(|e| UiError::RenderError(e.to_string()))?;

        tokio::select! {
            _ = shutdown.cancelled() => app.should_quit = true,
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    let action = map_event(&event, app.dialog.is_some());
                    app.handle(action, stream).await;
                }
                Some(Err(e)) => return Err(UiError::InputError(e.to_string()).into()),
                None => app.should_quit = true,
            },
            _ = ticker.tick() => {
                stream.pump();
                app.tick();
            }
        }
    }

    Ok(())
}

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App, panel: &ReadoutPanel, active: bool) {
    let [header, body, buttons, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_header(frame, header);
    widgets::render_readout(frame, body, panel, app.sensor_name.as_deref(), active);
    render_buttons(frame, buttons);
    widgets::render_status_bar(
        frame,
        status,
        app.sensor_name.is_some(),
        active,
        app.is_pulsing(),
        app.status_message.as_deref(),
        app.error_message.as_deref(),
    );

    if let Some(report) = &app.dialog {
        let area = popup_area(frame.area(), 60, widgets::dialog_height(report));
        widgets::render_dialog(frame, area, report);
    } else if app.show_help {
        let area = popup_area(frame.area(), 60, 22);
        widgets::render_help(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "Sensor Panel",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Press '?' for help", Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_buttons(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("[v] ", key_style),
        Span::raw("Vibrate"),
        Span::raw("    "),
        Span::styled("[c] ", key_style),
        Span::raw("Check connections"),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Horizontally and vertically centered popup, clamped to `area`
fn popup_area(area: Rect, width_percent: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(vertical);
    popup
}
