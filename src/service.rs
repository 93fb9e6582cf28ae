//! Headless service and process signal handling.
//!
//! Without a terminal the readout is rendered into the log. The stream is active for
//! the whole run and deactivated on shutdown. `SIGUSR1` fires a haptic pulse and
//! `SIGUSR2` logs a connectivity report, standing in for the screen's two buttons.

use crate::config::AppConfig;
use crate::error::{Result, ServiceError};
use crate::platform::{Capabilities, ConnectivityReport};
use crate::readout::{DisplaySink, ReadoutStream, SensorProvider, SensorSample};
use futures_util::StreamExt;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook_tokio::Signals;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Sink that writes each reading to the log
#[derive(Debug, Default)]
pub struct LogSink {
    rendered: u64,
}

impl LogSink {
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl DisplaySink for LogSink {
    fn render(&mut self, x: i32, y: i32, z: i32) {
        self.rendered += 1;
        tracing::info!(x, y, z, "{}", SensorSample { x, y, z });
    }
}

/// Cancel `token` on SIGINT, SIGTERM or SIGHUP
pub fn shutdown_on_signals(token: CancellationToken) -> Result<JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])
        .map_err(|e| ServiceError::SignalError(e.to_string()))?;
    let handle = signals.handle();

    Ok(tokio::spawn(async move {
        tokio::select! {
            Some(signal) = signals.next() => {
                tracing::info!(signal, "received shutdown signal");
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
        handle.close();
    }))
}

/// Run without a UI until `shutdown` is cancelled
pub async fn run_headless<P: SensorProvider>(
    config: &AppConfig,
    provider: P,
    mut capabilities: Capabilities,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut signals = Signals::new([SIGUSR1, SIGUSR2])
        .map_err(|e| ServiceError::SignalError(e.to_string()))?;
    let signals_handle = signals.handle();

    let tick = Duration::from_millis(config.service.tick_ms);
    let pulse = Duration::from_millis(config.haptics.pulse_ms);
    let mut stream = ReadoutStream::new(provider, LogSink::default());

    tracing::info!(tick_ms = config.service.tick_ms, "starting headless readout");
    stream.activate();

    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            Some(signal) = signals.next() => match signal {
                SIGUSR1 => {
                    if let Err(e) = capabilities.haptics.pulse(pulse) {
                        tracing::warn!(error = %e, "haptic pulse failed");
                    }
                }
                SIGUSR2 => {
                    let report = ConnectivityReport::gather(capabilities.probe.as_ref()).await;
                    tracing::info!("{}", report.message().replace("\n\n", " | ").replace('\n', " "));
                }
                _ => {}
            },
            _ = ticker.tick() => {
                stream.pump();
            }
        }
    }

    stream.deactivate();
    signals_handle.close();
    tracing::info!(samples = stream.sink().rendered(), "headless readout stopped");
    Ok(())
}
