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

//! # Domain Entities
//!
//! The "Nouns" of the exporter: cell values coming out of a table scan, and
//! the per-table and per-run results that decide the exit status.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::borrow::Cow;
use std::path::PathBuf;

/// One column value as returned by the driver.
///
/// Each variant has exactly one textual form (see [`CellValue::to_field`]), so
/// the CSV output does not depend on how the driver happens to print things.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// MySQL `TIME`: a signed duration whose hour part may exceed 24.
    Time {
        negative: bool,
        hours: u32,
        minutes: u8,
        seconds: u8,
        micros: u32,
    },
}

impl CellValue {
    /// Renders the value as a single CSV field.
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Int(v) => Cow::Owned(v.to_string()),
            CellValue::UInt(v) => Cow::Owned(v.to_string()),
            CellValue::Float(v) => Cow::Owned(format_float(*v)),
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Blob(b) => Cow::Owned(general_purpose::STANDARD.encode(b)),
            CellValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            CellValue::DateTime(dt) => Cow::Owned(format_datetime(dt)),
            CellValue::Time {
                negative,
                hours,
                minutes,
                seconds,
                micros,
            } => {
                let sign = if *negative { "-" } else { "" };
                let mut out = format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds);
                if *micros != 0 {
                    out.push_str(&format!(".{:06}", micros));
                }
                Cow::Owned(out)
            }
        }
    }
}

/// Shortest representation that parses back to the same `f64`.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v.is_sign_negative() { "-inf" } else { "inf" }.to_string()
    } else {
        // Debug keeps a trailing ".0" on integral values, Display does not.
        format!("{:?}", v)
    }
}

/// ISO-8601 without a zone; fractional seconds only when present.
fn format_datetime(dt: &NaiveDateTime) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    let micros = dt.nanosecond() / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

/// A single result row, columns in scan order.
pub type Row = Vec<CellValue>;

/// Terminal state of one requested table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableResult {
    Exported { rows: u64, path: PathBuf },
    Skipped { reason: String, path: PathBuf },
    Failed { error: String, timestamp: DateTime<Utc> },
}

impl TableResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, TableResult::Failed { .. })
    }
}

/// A table name paired with what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutcome {
    pub table: String,
    pub result: TableResult,
}

/// A per-table database error that was recorded instead of ending the run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredFailure {
    pub table: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything a run produced, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub outcomes: Vec<TableOutcome>,
    pub deferred: Vec<DeferredFailure>,
    /// Set when a non-deferred database error stopped the run early.
    pub aborted: bool,
}

impl RunSummary {
    pub fn exported_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, TableResult::Exported { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, TableResult::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_failed()).count()
    }

    /// Process exit status: skips are not failures.
    pub fn exit_code(&self) -> i32 {
        if self.failed_count() > 0 {
            1
        } else {
            0
        }
    }
}
