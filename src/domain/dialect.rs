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

//! Named bundles of delimited-text formatting rules.

use crate::domain::errors::{ExportError, Result};
use std::fmt;

/// When a field gets wrapped in quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Only fields containing the delimiter, quote, or a line break.
    Minimal,
    /// Every field.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    Lf,
    CrLf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDialect {
    pub name: &'static str,
    pub delimiter: u8,
    pub quote: u8,
    pub quoting: Quoting,
    pub terminator: LineTerminator,
}

const DIALECTS: &[CsvDialect] = &[
    CsvDialect {
        name: "excel",
        delimiter: b',',
        quote: b'"',
        quoting: Quoting::Minimal,
        terminator: LineTerminator::CrLf,
    },
    CsvDialect {
        name: "excel-tab",
        delimiter: b'\t',
        quote: b'"',
        quoting: Quoting::Minimal,
        terminator: LineTerminator::CrLf,
    },
    CsvDialect {
        name: "unix",
        delimiter: b',',
        quote: b'"',
        quoting: Quoting::Minimal,
        terminator: LineTerminator::Lf,
    },
    CsvDialect {
        name: "unix-quote-all",
        delimiter: b',',
        quote: b'"',
        quoting: Quoting::All,
        terminator: LineTerminator::Lf,
    },
];

impl CsvDialect {
    /// Looks up a dialect by its registered name.
    pub fn by_name(name: &str) -> Result<Self> {
        DIALECTS
            .iter()
            .find(|d| d.name == name)
            .copied()
            .ok_or_else(|| {
                ExportError::ConfigError(format!(
                    "unknown CSV dialect {:?}; possible values: {}",
                    name,
                    quoted_list(Self::names())
                ))
            })
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        DIALECTS.iter().map(|d| d.name)
    }
}

impl fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// `"a", "b", "c"` for help and error text.
pub fn quoted_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|i| format!("\"{}\"", i))
        .collect::<Vec<_>>()
        .join(", ")
}
