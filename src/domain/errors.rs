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

//! Core error definitions for the table exporter.
//!
//! This module provides a centralized `ExportError` enum and a `Result` type
//! used throughout the application to handle database, I/O, and logic errors.

use thiserror::Error;

/// Error types encountered during the export process.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Query failed for {table}: {reason}")]
    QueryError { table: String, reason: String },

    #[error("Invalid table name {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("CSV error: {0}")]
    CsvError(String),
}

impl ExportError {
    /// Builds a `QueryError` for `table` from any displayable driver error.
    pub fn query(table: &str, reason: impl std::fmt::Display) -> Self {
        ExportError::QueryError {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Per-table database-side failures. Only these are subject to the
    /// defer-exceptions policy; everything else ends the run.
    pub fn is_deferrable(&self) -> bool {
        matches!(
            self,
            ExportError::QueryError { .. } | ExportError::InvalidIdentifier { .. }
        )
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::CsvError(e.to_string())
    }
}

/// A specialized Result type for the table exporter.
pub type Result<T> = std::result::Result<T, ExportError>;
