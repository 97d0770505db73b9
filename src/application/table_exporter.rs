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

//! # Table Exporter
//!
//! Exports exactly one table per call:
//! 1. validate the name and work out `<output_dir>/<table>.csv`,
//! 2. skip (or announce an overwrite) if that file already exists,
//! 3. open the scan, write the header, then pull and write chunks until an
//!    empty chunk comes back.
//!
//! Errors are returned to the caller untouched; whether a failure ends the run
//! is the orchestrator's decision.

use crate::application::runtime::RunContext;
use crate::config::ExportConfig;
use crate::domain::dialect::CsvDialect;
use crate::domain::entities::TableResult;
use crate::domain::errors::Result;
use crate::domain::events::ExportEvent;
use crate::domain::identifier::TableName;
use crate::infrastructure::local_storage::csv_table_writer::CsvTableWriter;
use crate::infrastructure::local_storage::text_encoding::TextEncoding;
use crate::ports::table_source::{RowCursor, TableSource};
use std::path::PathBuf;

/// Resolved, validated settings for one run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub overwrite: bool,
    pub defer_failures: bool,
    pub dialect: CsvDialect,
    pub encoding: TextEncoding,
}

impl ExportOptions {
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Ok(Self {
            output_dir: config.output_dir.clone(),
            chunk_size: config.chunksize.max(1),
            overwrite: config.overwrite,
            defer_failures: config.defer_exceptions,
            dialect: config.dialect()?,
            encoding: config.encoding()?,
        })
    }
}

pub struct TableExporter<'a> {
    source: &'a mut dyn TableSource,
    options: &'a ExportOptions,
    ctx: &'a RunContext,
}

impl<'a> TableExporter<'a> {
    pub fn new(
        source: &'a mut dyn TableSource,
        options: &'a ExportOptions,
        ctx: &'a RunContext,
    ) -> Self {
        Self {
            source,
            options,
            ctx,
        }
    }

    pub fn output_path(&self, table: &TableName) -> PathBuf {
        self.options
            .output_dir
            .join(format!("{}.csv", table.as_str()))
    }

    pub fn export_table(&mut self, raw_name: &str) -> Result<TableResult> {
        let table = TableName::parse(raw_name)?;
        self.ctx.emit(ExportEvent::TableStarted {
            table: table.to_string(),
        });

        let path = self.output_path(&table);
        if path.exists() {
            if !self.options.overwrite {
                self.ctx.emit(ExportEvent::SkippedExisting {
                    table: table.to_string(),
                    path: path.clone(),
                });
                return Ok(TableResult::Skipped {
                    reason: "output file exists".to_string(),
                    path,
                });
            }
            self.ctx.emit(ExportEvent::OverwritingExisting {
                table: table.to_string(),
                path: path.clone(),
            });
        }

        let mut cursor = self.source.open_scan(&table)?;
        let writer =
            CsvTableWriter::create(&path, &self.options.dialect, self.options.encoding)?;

        match write_table(
            cursor.as_mut(),
            writer,
            self.options.chunk_size,
            self.ctx,
            &table,
        ) {
            Ok(rows) => {
                self.ctx.emit(ExportEvent::TableExported {
                    table: table.to_string(),
                    rows,
                    path: path.clone(),
                });
                Ok(TableResult::Exported { rows, path })
            }
            Err(e) => {
                // A truncated file must not look like a finished export to a later run.
                if std::fs::remove_file(&path).is_ok() {
                    self.ctx.emit(ExportEvent::PartialOutputRemoved {
                        table: table.to_string(),
                        path,
                    });
                }
                Err(e)
            }
        }
    }
}

/// Header first, then one write per chunk. The writer is consumed so the file
/// handle is closed on every path out of here.
fn write_table(
    cursor: &mut dyn RowCursor,
    mut writer: CsvTableWriter,
    chunk_size: usize,
    ctx: &RunContext,
    table: &TableName,
) -> Result<u64> {
    writer.write_header(cursor.columns())?;

    loop {
        let chunk = cursor.next_chunk(chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        let rows = writer.write_chunk(&chunk)?;
        ctx.emit(ExportEvent::ChunkWritten {
            table: table.to_string(),
            rows,
            path: writer.path().to_path_buf(),
        });
    }

    writer.finish()?;
    Ok(cursor.row_count())
}
