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

//! # Table Name Validation
//!
//! SQL has no placeholder for identifiers, so a table name ends up inside the
//! statement text. Instead of escaping whatever the user typed, we only accept
//! names from a small grammar (ASCII letters, digits, underscore) and refuse
//! everything else up front.

use crate::domain::errors::{ExportError, Result};
use std::fmt;

/// MySQL caps identifiers at 64 characters.
const MAX_IDENTIFIER_LEN: usize = 64;

/// Reserved words that cannot be used as a bare table name.
const RESERVED_WORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "BETWEEN", "BY", "CALL", "CASCADE",
    "CASE", "CHECK", "COLUMN", "CONDITION", "CONSTRAINT", "CREATE", "CROSS", "DATABASE",
    "DEFAULT", "DELETE", "DESC", "DESCRIBE", "DISTINCT", "DROP", "ELSE", "EXISTS", "EXPLAIN",
    "FALSE", "FOR", "FOREIGN", "FROM", "FUNCTION", "GRANT", "GROUP", "HAVING", "IF", "IN",
    "INDEX", "INNER", "INSERT", "INTERVAL", "INTO", "IS", "JOIN", "KEY", "KEYS", "KILL", "LEFT",
    "LIKE", "LIMIT", "LOCK", "NOT", "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY",
    "PROCEDURE", "RANGE", "REFERENCES", "RENAME", "REPLACE", "REVOKE", "RIGHT", "SCHEMA",
    "SELECT", "SET", "SHOW", "TABLE", "THEN", "TO", "TRIGGER", "TRUE", "UNION", "UNIQUE",
    "UPDATE", "USE", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

/// A table name that passed the identifier allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validates `raw` against the identifier grammar.
    pub fn parse(raw: &str) -> Result<Self> {
        let reject = |reason: &str| ExportError::InvalidIdentifier {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(reject("name is empty"));
        }
        if raw.len() > MAX_IDENTIFIER_LEN {
            return Err(reject("name is longer than 64 characters"));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(reject(&format!(
                "character {:?} is not a letter, digit or underscore",
                c
            )));
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(reject("name cannot consist only of digits"));
        }
        let upper = raw.to_ascii_uppercase();
        if RESERVED_WORDS.contains(&upper.as_str()) {
            return Err(reject("name is a reserved word"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full-table scan statement for this table.
    pub fn scan_statement(&self) -> String {
        format!("SELECT * FROM `{}`", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_for(raw: &str) -> String {
        match TableName::parse(raw) {
            Err(ExportError::InvalidIdentifier { reason, .. }) => reason,
            other => panic!("expected InvalidIdentifier for {:?}, got {:?}", raw, other),
        }
    }

    #[test]
    fn test_accepts_plain_names() {
        for name in ["users", "order_items", "T1", "_staging", "2024_sales", "Customer"] {
            let parsed = TableName::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_rejects_outside_grammar() {
        assert_eq!(reason_for(""), "name is empty");
        assert!(reason_for("users; DROP TABLE users").contains("';'"));
        assert!(reason_for("db.users").contains("'.'"));
        assert!(reason_for("../etc/passwd").contains("'.'"));
        assert!(reason_for("us`ers").contains("'`'"));
        assert!(reason_for("café").contains("'é'"));
        assert_eq!(reason_for("12345"), "name cannot consist only of digits");
        assert_eq!(reason_for(&"a".repeat(65)), "name is longer than 64 characters");
    }

    #[test]
    fn test_rejects_reserved_words_case_insensitively() {
        assert_eq!(reason_for("select"), "name is a reserved word");
        assert_eq!(reason_for("Table"), "name is a reserved word");
        assert!(TableName::parse("selection").is_ok());
    }

    #[test]
    fn test_scan_statement() {
        let t = TableName::parse("users").unwrap();
        assert_eq!(t.scan_statement(), "SELECT * FROM `users`");
        assert_eq!(t.to_string(), "users");
    }

    #[test]
    fn test_max_length_is_inclusive() {
        assert!(TableName::parse(&"a".repeat(64)).is_ok());
    }
}
