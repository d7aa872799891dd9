//! Timestamped event scripts.
//!
//! A script is JSONL: one event per line, `#` lines are comments. Scripts
//! drive deterministic replays of pointer, layout, and scroll activity.

use serde::{Deserialize, Serialize};

use crate::geometry::Region;

/// Monotonic timestamp in nanoseconds since the script started.
pub type TimestampNs = u64;

/// A single scripted event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of scripted events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved. Moves off the element count as leaving it.
    PointerMove {
        /// Viewport-relative X.
        x: f64,
        /// Viewport-relative Y.
        y: f64,
    },

    /// Pointer left the element.
    PointerLeave,

    /// The element was laid out again.
    Layout {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },

    /// The page scrolled to vertical offset `y`.
    Scroll { y: f64 },
}

impl TimedEvent {
    pub fn pointer_move(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::PointerMove { x, y },
        }
    }

    pub fn pointer_leave(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::PointerLeave,
        }
    }

    pub fn layout(timestamp_ns: TimestampNs, region: Region) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Layout {
                left: region.left,
                top: region.top,
                width: region.width,
                height: region.height,
            },
        }
    }

    pub fn scroll(timestamp_ns: TimestampNs, y: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Scroll { y },
        }
    }
}

/// A script line that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    /// 1-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<TimedEvent>, ScriptError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| ScriptError { line, source })
        })
        .collect()
}
