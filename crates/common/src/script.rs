//! Loading event scripts from disk.

use std::path::Path;

use lodestone_model::event::{parse_events, TimedEvent};

use crate::error::{LodestoneError, LodestoneResult};

/// Read and parse a JSONL event script.
pub fn load_script(path: &Path) -> LodestoneResult<Vec<TimedEvent>> {
    if !path.exists() {
        return Err(LodestoneError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let events = parse_events(&content)?;
    tracing::debug!(path = ?path, events = events.len(), "Loaded script");
    Ok(events)
}
