//! Jump to a map application at a location.

use super::connectivity::Location;
use crate::config::MapConfig;
use crate::error::PlatformError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// How long an opener may take to fail before it counts as launched
const LAUNCH_GRACE: Duration = Duration::from_millis(300);

/// `geo:` URI with a labelled query pin, e.g. `geo:1.5,2?q=1.5,2(My Location)`
pub fn geo_uri(location: Location, label: &str) -> String {
    let (lat, lon) = (location.latitude, location.longitude);
    format!("geo:{lat},{lon}?q={lat},{lon}({label})")
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapLauncher: Send + Sync {
    async fn open(&self, uri: &str) -> Result<(), PlatformError>;
}

/// Runs an external opener with the URI as its only argument.
/// The preferred opener is tried first; the fallback is used when it is missing or
/// exits unsuccessfully. An opener still running after a short grace period counts
/// as launched and is reaped in the background, so `open` never waits on the map app.
pub struct CommandLauncher {
    preferred: Option<String>,
    fallback: String,
}

impl CommandLauncher {
    pub fn new(preferred: Option<String>, fallback: String) -> Self {
        Self {
            preferred,
            fallback,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.preferred_opener.clone(), config.fallback_opener.clone())
    }
}

#[async_trait]
impl MapLauncher for CommandLauncher {
    async fn open(&self, uri: &str) -> Result<(), PlatformError> {
        if let Some(preferred) = &self.preferred {
            match run_opener(preferred, uri).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(error = %e, fallback = %self.fallback, "preferred map opener failed");
                }
            }
        }
        run_opener(&self.fallback, uri).await
    }
}

async fn run_opener(program: &str, uri: &str) -> Result<(), PlatformError> {
    let launch_error = |message: String| PlatformError::LaunchError {
        opener: program.to_string(),
        message,
    };

    let mut child = Command::new(program)
        .arg(uri)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| launch_error(e.to_string()))?;

    // Hand-off openers exit at once; a map application keeps running in the foreground
    match tokio::time::timeout(LAUNCH_GRACE, child.wait()).await {
        Ok(Ok(status)) if status.success() => {}
        Ok(Ok(status)) => return Err(launch_error(format!("exited with {}", status))),
        Ok(Err(e)) => return Err(launch_error(e.to_string())),
        Err(_) => {
            let opener = program.to_string();
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) => tracing::debug!(%opener, %status, "map opener exited"),
                    Err(e) => tracing::debug!(%opener, error = %e, "failed to reap map opener"),
                }
            });
        }
    }

    tracing::info!(opener = program, uri, "map opened");
    Ok(())
}
