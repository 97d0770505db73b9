// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Export Events
//!
//! Everything observable that happens during a run is described by an
//! `ExportEvent`. The exporter never talks to a logger directly; it hands
//! events to the `RunContext`, which decides where they go.

use chrono::{DateTime, Utc};
use log::Level;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Connecting {
        endpoint: String,
    },
    ConnectionClosed {
        endpoint: String,
    },
    TableStarted {
        table: String,
    },
    OverwritingExisting {
        table: String,
        path: PathBuf,
    },
    SkippedExisting {
        table: String,
        path: PathBuf,
    },
    ChunkWritten {
        table: String,
        rows: usize,
        path: PathBuf,
    },
    TableExported {
        table: String,
        rows: u64,
        path: PathBuf,
    },
    TableFailed {
        table: String,
        error: String,
        deferred: bool,
    },
    PartialOutputRemoved {
        table: String,
        path: PathBuf,
    },
    DeferredReplayStarted {
        count: usize,
    },
    DeferredFailureReplayed {
        table: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
    RunFinished {
        exported: usize,
        skipped: usize,
        failed: usize,
        after_deferred: bool,
    },
}

impl ExportEvent {
    /// Severity the event is reported at.
    pub fn level(&self) -> Level {
        match self {
            ExportEvent::TableStarted { .. }
            | ExportEvent::ChunkWritten { .. }
            | ExportEvent::ConnectionClosed { .. } => Level::Debug,
            ExportEvent::Connecting { .. }
            | ExportEvent::TableExported { .. }
            | ExportEvent::DeferredReplayStarted { .. }
            | ExportEvent::RunFinished { .. } => Level::Info,
            ExportEvent::OverwritingExisting { .. }
            | ExportEvent::SkippedExisting { .. }
            | ExportEvent::TableFailed { .. }
            | ExportEvent::PartialOutputRemoved { .. } => Level::Warn,
            ExportEvent::DeferredFailureReplayed { .. } => Level::Error,
        }
    }
}

impl fmt::Display for ExportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportEvent::Connecting { endpoint } => write!(f, "connecting to {}", endpoint),
            ExportEvent::ConnectionClosed { endpoint } => {
                write!(f, "closed database connection to {}", endpoint)
            }
            ExportEvent::TableStarted { table } => write!(f, "dumping table: {}", table),
            ExportEvent::OverwritingExisting { table, path } => write!(
                f,
                "{}: overwriting existing output file {}",
                table,
                path.display()
            ),
            ExportEvent::SkippedExisting { table, path } => write!(
                f,
                "{}: skipping table because output file {} already exists",
                table,
                path.display()
            ),
            ExportEvent::ChunkWritten { table, rows, path } => write!(
                f,
                "{}: wrote {}-row chunk to {}",
                table,
                rows,
                path.display()
            ),
            ExportEvent::TableExported { table, rows, path } => write!(
                f,
                "{}: finished dumping table to {} ({} rows)",
                table,
                path.display(),
                rows
            ),
            ExportEvent::TableFailed {
                table,
                error,
                deferred,
            } => write!(
                f,
                "{}{}: database exception: {}",
                if *deferred { "DEFERRING " } else { "" },
                table,
                error
            ),
            ExportEvent::PartialOutputRemoved { table, path } => write!(
                f,
                "{}: removed incomplete output file {}",
                table,
                path.display()
            ),
            ExportEvent::DeferredReplayStarted { count } => write!(
                f,
                "Re-printing {} previously-deferred database exception(s)",
                count
            ),
            // `error` already names the table.
            ExportEvent::DeferredFailureReplayed {
                error, timestamp, ..
            } => write!(
                f,
                "DEFERRED DATABASE EXCEPTION FROM {}: {}",
                timestamp.to_rfc3339(),
                error
            ),
            ExportEvent::RunFinished {
                exported,
                skipped,
                failed,
                after_deferred,
            } => write!(
                f,
                "exiting{} ({} exported, {} skipped, {} failed)",
                if *after_deferred {
                    " (after deferred exceptions)"
                } else {
                    ""
                },
                exported,
                skipped,
                failed
            ),
        }
    }
}
