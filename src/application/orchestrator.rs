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

//! The run-level loop: drives the table exporter over the requested tables in
//! order, applies the defer/abort policy, and aggregates the outcome.

use crate::application::runtime::RunContext;
use crate::application::table_exporter::{ExportOptions, TableExporter};
use crate::domain::entities::{DeferredFailure, RunSummary, TableOutcome, TableResult};
use crate::domain::errors::Result;
use crate::domain::events::ExportEvent;
use crate::ports::table_source::TableSource;
use chrono::Utc;

pub struct ExportOrchestrator {
    options: ExportOptions,
    ctx: RunContext,
}

impl ExportOrchestrator {
    pub fn new(options: ExportOptions, ctx: RunContext) -> Self {
        Self { options, ctx }
    }

    pub fn ctx(&self) -> &RunContext {
        &self.ctx
    }

    /// Exports `tables` one after another through `source`.
    ///
    /// Database errors on a single table (`is_deferrable`) are recorded and the
    /// run continues when deferral is on; otherwise the run stops at that table
    /// and the summary comes back with `aborted` set. Any other error ends the
    /// run immediately and is returned as `Err`.
    pub fn run(&self, source: &mut dyn TableSource, tables: &[String]) -> Result<RunSummary> {
        std::fs::create_dir_all(&self.options.output_dir)?;

        let mut summary = RunSummary::default();
        let mut exporter = TableExporter::new(source, &self.options, &self.ctx);

        for table in tables {
            let err = match exporter.export_table(table) {
                Ok(result) => {
                    summary.outcomes.push(TableOutcome {
                        table: table.clone(),
                        result,
                    });
                    continue;
                }
                Err(e) => e,
            };

            let deferred = err.is_deferrable() && self.options.defer_failures;
            let timestamp = Utc::now();
            let error = err.to_string();
            self.ctx.emit(ExportEvent::TableFailed {
                table: table.clone(),
                error: error.clone(),
                deferred,
            });

            if !err.is_deferrable() {
                self.replay_deferred(&summary.deferred);
                return Err(err);
            }

            summary.outcomes.push(TableOutcome {
                table: table.clone(),
                result: TableResult::Failed {
                    error: error.clone(),
                    timestamp,
                },
            });
            if !deferred {
                summary.aborted = true;
                break;
            }
            summary.deferred.push(DeferredFailure {
                table: table.clone(),
                error,
                timestamp,
            });
        }

        self.replay_deferred(&summary.deferred);
        self.ctx.emit(ExportEvent::RunFinished {
            exported: summary.exported_count(),
            skipped: summary.skipped_count(),
            failed: summary.failed_count(),
            after_deferred: !summary.deferred.is_empty(),
        });

        Ok(summary)
    }

    /// Re-reports every deferred failure with its capture time. Runs on every
    /// way out of `run`, including a fatal error after some tables were deferred.
    fn replay_deferred(&self, deferred: &[DeferredFailure]) {
        if deferred.is_empty() {
            return;
        }
        self.ctx.emit(ExportEvent::DeferredReplayStarted {
            count: deferred.len(),
        });
        for failure in deferred {
            self.ctx.emit(ExportEvent::DeferredFailureReplayed {
                table: failure.table.clone(),
                error: failure.error.clone(),
                timestamp: failure.timestamp,
            });
        }
    }
}
