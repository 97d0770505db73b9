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

//! In-memory adapters for tests: a scripted `TableSource` and an `EventSink`
//! that records what it receives.

use crate::domain::entities::Row;
use crate::domain::errors::{ExportError, Result};
use crate::domain::events::ExportEvent;
use crate::domain::identifier::TableName;
use crate::ports::event_sink::EventSink;
use crate::ports::table_source::{RowCursor, TableSource};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Default)]
pub struct InMemoryTableSource {
    tables: HashMap<String, (Vec<String>, Vec<Row>)>,
    scan_failures: HashSet<String>,
    /// Table -> number of rows served before the fetch fails.
    fetch_failures: HashMap<String, u64>,
    /// Every scan issued, in order.
    pub scans: Vec<String>,
    /// Length of every non-empty chunk handed out, in order.
    pub chunk_sizes: Vec<usize>,
}

impl InMemoryTableSource {
    pub fn with_table(mut self, name: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        self.tables.insert(
            name.to_string(),
            (columns.iter().map(|c| c.to_string()).collect(), rows),
        );
        self
    }

    pub fn failing_scan(mut self, name: &str) -> Self {
        self.scan_failures.insert(name.to_string());
        self
    }

    pub fn failing_fetch_after(mut self, name: &str, rows: u64) -> Self {
        self.fetch_failures.insert(name.to_string(), rows);
        self
    }
}

impl TableSource for InMemoryTableSource {
    fn open_scan(&mut self, table: &TableName) -> Result<Box<dyn RowCursor + '_>> {
        let name = table.as_str().to_string();
        self.scans.push(name.clone());

        if self.scan_failures.contains(&name) {
            return Err(ExportError::query(&name, "scripted scan failure"));
        }
        let (columns, rows) = self
            .tables
            .get(&name)
            .cloned()
            .ok_or_else(|| ExportError::query(&name, format!("Table '{}' doesn't exist", name)))?;

        Ok(Box::new(MemoryCursor {
            fail_after: self.fetch_failures.get(&name).copied(),
            table: name,
            columns,
            rows: rows.into_iter(),
            served: 0,
            chunk_sizes: &mut self.chunk_sizes,
        }))
    }
}

struct MemoryCursor<'a> {
    table: String,
    columns: Vec<String>,
    rows: std::vec::IntoIter<Row>,
    fail_after: Option<u64>,
    served: u64,
    chunk_sizes: &'a mut Vec<usize>,
}

impl RowCursor for MemoryCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_chunk(&mut self, max_rows: usize) -> Result<Vec<Row>> {
        let mut chunk = Vec::new();
        while chunk.len() < max_rows {
            if self.fail_after == Some(self.served) {
                return Err(ExportError::query(&self.table, "Lost connection to server during query"));
            }
            match self.rows.next() {
                Some(row) => {
                    chunk.push(row);
                    self.served += 1;
                }
                None => break,
            }
        }
        if !chunk.is_empty() {
            self.chunk_sizes.push(chunk.len());
        }
        Ok(chunk)
    }

    fn row_count(&self) -> u64 {
        self.served
    }
}

/// Shares its event log between clones, so a test can keep one handle while
/// the `RunContext` owns the other.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<ExportEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ExportEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ExportEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
