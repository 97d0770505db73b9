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

//! Concrete `TableSource` backed by a single MySQL/MariaDB connection.

use crate::domain::entities::Row;
use crate::domain::errors::{ExportError, Result};
use crate::domain::identifier::TableName;
use crate::infrastructure::mysql::value_mapping::{to_cell, ColumnKind};
use crate::ports::table_source::{RowCursor, TableSource};
use log::debug;
use mysql::prelude::Queryable;
use mysql::{Binary, Column, Conn, QueryResult, Value};

/// Owns the process-wide connection. Dropping it closes the connection.
pub struct MySqlTableSource {
    conn: Conn,
}

impl MySqlTableSource {
    pub(crate) fn new(conn: Conn) -> Self {
        Self { conn }
    }
}

impl TableSource for MySqlTableSource {
    fn open_scan(&mut self, table: &TableName) -> Result<Box<dyn RowCursor + '_>> {
        let sql = table.scan_statement();
        debug!("{}: executing {}", table, sql);

        // The binary protocol streams rows off the socket as they are pulled
        // and reports typed values instead of text.
        let result = self
            .conn
            .exec_iter(sql, ())
            .map_err(|e| ExportError::query(table.as_str(), e))?;

        let (columns, kinds) = describe_columns(result.columns().as_ref());

        Ok(Box::new(MySqlRowCursor {
            table: table.to_string(),
            result,
            columns,
            kinds,
            rows: 0,
        }))
    }
}

struct MySqlRowCursor<'a> {
    table: String,
    result: QueryResult<'a, 'a, 'a, Binary>,
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: u64,
}

impl RowCursor for MySqlRowCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_chunk(&mut self, max_rows: usize) -> Result<Vec<Row>> {
        let mut chunk = Vec::with_capacity(max_rows.min(4096));
        while chunk.len() < max_rows {
            let row = match self.result.next() {
                Some(row) => row.map_err(|e| ExportError::query(&self.table, e))?,
                None => break,
            };
            chunk.push(convert_row(row.unwrap_raw(), &self.kinds));
        }
        self.rows += chunk.len() as u64;
        Ok(chunk)
    }

    fn row_count(&self) -> u64 {
        self.rows
    }
}

/// Column names and value kinds, in result-set order.
fn describe_columns(columns: &[Column]) -> (Vec<String>, Vec<ColumnKind>) {
    columns
        .iter()
        .map(|c| {
            (
                c.name_str().into_owned(),
                ColumnKind::classify(c.column_type(), c.character_set()),
            )
        })
        .unzip()
}

/// A value the driver already consumed (`None`) is written as NULL.
fn convert_row(values: Vec<Option<Value>>, kinds: &[ColumnKind]) -> Row {
    values
        .into_iter()
        .zip(kinds.iter())
        .map(|(v, kind)| to_cell(v.unwrap_or(Value::NULL), *kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CellValue;
    use chrono::NaiveDate;
    use mysql::consts::ColumnType;

    const UTF8MB4: u16 = 255;
    const BINARY: u16 = 63;

    fn orders_columns() -> Vec<Column> {
        vec![
            Column::new(ColumnType::MYSQL_TYPE_LONGLONG)
                .with_name(b"id")
                .with_character_set(BINARY),
            Column::new(ColumnType::MYSQL_TYPE_VAR_STRING)
                .with_name(b"customer")
                .with_character_set(UTF8MB4),
            Column::new(ColumnType::MYSQL_TYPE_DATE)
                .with_name(b"placed_on")
                .with_character_set(BINARY),
            Column::new(ColumnType::MYSQL_TYPE_BLOB)
                .with_name(b"receipt")
                .with_character_set(BINARY),
        ]
    }

    #[test]
    fn test_describe_columns_keeps_order_and_kinds() {
        let (names, kinds) = describe_columns(&orders_columns());
        assert_eq!(names, vec!["id", "customer", "placed_on", "receipt"]);
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Other,
                ColumnKind::Other,
                ColumnKind::Date,
                ColumnKind::Binary
            ]
        );
    }

    #[test]
    fn test_convert_row_maps_each_value_with_its_column_kind() {
        let (_, kinds) = describe_columns(&orders_columns());
        let row = convert_row(
            vec![
                Some(Value::Int(7)),
                Some(Value::Bytes(b"Alice".to_vec())),
                Some(Value::Date(2024, 2, 29, 0, 0, 0, 0)),
                Some(Value::Bytes(vec![0xff, 0x00])),
            ],
            &kinds,
        );
        assert_eq!(
            row,
            vec![
                CellValue::Int(7),
                CellValue::Text("Alice".into()),
                CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
                CellValue::Blob(vec![0xff, 0x00]),
            ]
        );
    }

    #[test]
    fn test_convert_row_nulls() {
        let (_, kinds) = describe_columns(&orders_columns());
        let row = convert_row(vec![Some(Value::NULL), None, None, None], &kinds);
        assert_eq!(row, vec![CellValue::Null; 4]);
    }
}
