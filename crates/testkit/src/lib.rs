#![warn(missing_docs)]
//! Test surfaces: event streams, golden snapshots, scenarios and doubles.

mod recording;
mod scenario;
mod snapshot;

use anyhow::Result;
use marionette_core::SimTick;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use recording::*;
pub use scenario::*;
pub use snapshot::*;

/// One line of an event stream.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Tick when the event occurred.
    pub tick: SimTick,
    /// Event label (e.g. a dispatch outcome kind).
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
