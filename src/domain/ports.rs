//! Domain Ports - Collaborator seams for the status engine
//!
//! The engine does not fetch resources, read the wall clock or localize
//! timestamps itself. These traits and wrappers define what it expects from
//! the resource-watch provider, the clock and the time formatter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Resource Watch
// =============================================================================

/// Result of watching one upstream resource (or list of resources)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watched<T> {
    /// Latest observed data; `None` when the object does not exist
    pub data: Option<T>,
    /// Whether the initial load completed
    #[serde(default)]
    pub loaded: bool,
    /// Error reported by the watch, if any
    #[serde(default)]
    pub load_error: Option<String>,
}

impl<T> Watched<T> {
    /// A completed watch holding `data`
    pub fn loaded(data: T) -> Self {
        Self {
            data: Some(data),
            loaded: true,
            load_error: None,
        }
    }

    /// A completed watch that found nothing
    pub fn loaded_empty() -> Self {
        Self {
            data: None,
            loaded: true,
            load_error: None,
        }
    }

    /// A watch still waiting for its first result
    pub fn loading() -> Self {
        Self {
            data: None,
            loaded: false,
            load_error: None,
        }
    }

    /// A watch that failed
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: None,
            loaded: false,
            load_error: Some(error.into()),
        }
    }

    /// Loaded without error
    pub fn is_ready(&self) -> bool {
        self.loaded && self.load_error.is_none()
    }

    /// Data when the watch is ready, or why it is not
    pub fn ready(&self) -> std::result::Result<Option<&T>, WatchPending<'_>> {
        if let Some(err) = &self.load_error {
            return Err(WatchPending::Failed(err));
        }
        if !self.loaded {
            return Err(WatchPending::Loading);
        }
        Ok(self.data.as_ref())
    }
}

impl<T> Default for Watched<T> {
    fn default() -> Self {
        Self::loading()
    }
}

/// Why a watch cannot be used yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPending<'a> {
    Loading,
    Failed(&'a str),
}

impl std::fmt::Display for WatchPending<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchPending::Loading => write!(f, "loading"),
            WatchPending::Failed(err) => write!(f, "load failed: {}", err),
        }
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of "now" for staleness calculations
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// Time Formatting
// =============================================================================

/// Renders timestamps for human readable detail strings
pub trait TimeFormatter: Send + Sync {
    fn format(&self, timestamp: &DateTime<Utc>) -> String;
}

/// Formats as e.g. "May 1, 2024, 10:00 AM UTC"
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTimeFormatter;

impl TimeFormatter for DefaultTimeFormatter {
    fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format("%b %-d, %Y, %-I:%M %p UTC").to_string()
    }
}
