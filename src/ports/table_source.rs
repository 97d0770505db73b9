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

//! # Table Source Port
//!
//! This Port defines what it means to "scan a table". The exporter does not
//! care whether rows come from MySQL, MariaDB, or an in-memory fake used in
//! tests; anything implementing `TableSource` can feed it.

use crate::domain::entities::Row;
use crate::domain::errors::Result;
use crate::domain::identifier::TableName;

/// A live connection that can run one full-table scan at a time.
///
/// The returned cursor borrows the source mutably, so a second scan cannot be
/// opened while rows from the first are still being pulled.
pub trait TableSource {
    /// Starts a scan of `table`. Fails with `QueryError` when the server
    /// rejects the statement.
    fn open_scan(&mut self, table: &TableName) -> Result<Box<dyn RowCursor + '_>>;
}

/// Rows of one scan, pulled in bounded chunks.
pub trait RowCursor {
    /// Column names in result-set order. Known before any row is fetched.
    fn columns(&self) -> &[String];

    /// Returns up to `max_rows` rows. An empty chunk means the scan is exhausted.
    fn next_chunk(&mut self, max_rows: usize) -> Result<Vec<Row>>;

    /// Rows handed out so far; the table's row count once exhausted.
    fn row_count(&self) -> u64;
}
