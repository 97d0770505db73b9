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

//! # Runtime Context
//!
//! The `RunContext` is handed explicitly to everything that reports progress.
//! It carries the chosen verbosity and the sink that receives events, so the
//! exporter never reaches for a global logger and tests can capture events
//! instead of scraping console output.

use crate::domain::events::ExportEvent;
use crate::infrastructure::logging::LogEventSink;
use crate::ports::event_sink::EventSink;
use log::LevelFilter;

pub struct RunContext {
    verbosity: LevelFilter,
    sink: Box<dyn EventSink>,
}

impl RunContext {
    pub fn new(verbosity: LevelFilter, sink: Box<dyn EventSink>) -> Self {
        Self { verbosity, sink }
    }

    /// Context for a normal CLI run: events go to the `log` facade.
    pub fn with_log_sink(verbosity: LevelFilter) -> Self {
        Self::new(verbosity, Box::new(LogEventSink))
    }

    pub fn verbosity(&self) -> LevelFilter {
        self.verbosity
    }

    /// Forwards `event` to the sink unless it is below the configured verbosity.
    pub fn emit(&self, event: ExportEvent) {
        if event.level() <= self.verbosity {
            self.sink.emit(&event);
        }
    }
}
