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

//! # Driver Value Mapping
//!
//! The binary protocol hands back `mysql::Value`s, which are only loosely
//! typed: a `VARCHAR`, a `DECIMAL` and a `BLOB` all arrive as `Value::Bytes`,
//! and a `DATE` arrives as a full date-time with zeroed clock fields. The column
//! definition tells them apart, so each column is classified once per scan and
//! every value is mapped with its column's kind.

use crate::domain::entities::CellValue;
use chrono::NaiveDate;
use mysql::consts::ColumnType;
use mysql::Value;

/// Collation id of the `binary` character set.
const BINARY_CHARSET: u16 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Raw bytes: BLOB/BINARY/VARBINARY, BIT, GEOMETRY.
    Binary,
    /// DATE (no time of day).
    Date,
    Other,
}

impl ColumnKind {
    pub fn classify(column_type: ColumnType, charset: u16) -> Self {
        match column_type {
            ColumnType::MYSQL_TYPE_BIT | ColumnType::MYSQL_TYPE_GEOMETRY => ColumnKind::Binary,
            ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => ColumnKind::Date,
            ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB
            | ColumnType::MYSQL_TYPE_STRING
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_VARCHAR
                if charset == BINARY_CHARSET =>
            {
                ColumnKind::Binary
            }
            _ => ColumnKind::Other,
        }
    }
}

/// Converts one driver value into a `CellValue`.
pub fn to_cell(value: Value, kind: ColumnKind) -> CellValue {
    match value {
        Value::NULL => CellValue::Null,
        Value::Int(v) => CellValue::Int(v),
        Value::UInt(v) => CellValue::UInt(v),
        Value::Float(v) => CellValue::Float(widen_f32(v)),
        Value::Double(v) => CellValue::Float(v),
        Value::Bytes(bytes) => match kind {
            ColumnKind::Binary => CellValue::Blob(bytes),
            _ => match String::from_utf8(bytes) {
                Ok(s) => CellValue::Text(s),
                Err(e) => CellValue::Blob(e.into_bytes()),
            },
        },
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            match (date, kind) {
                (Some(d), ColumnKind::Date) => CellValue::Date(d),
                (Some(d), _) => d
                    .and_hms_micro_opt(hour as u32, minute as u32, second as u32, micros)
                    .map(CellValue::DateTime)
                    .unwrap_or_else(|| {
                        CellValue::Text(raw_datetime(
                            year, month, day, hour, minute, second, micros, kind,
                        ))
                    }),
                // Zero dates ('0000-00-00') have no calendar representation.
                (None, _) => CellValue::Text(raw_datetime(
                    year, month, day, hour, minute, second, micros, kind,
                )),
            }
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => CellValue::Time {
            negative,
            hours: days * 24 + hours as u32,
            minutes,
            seconds,
            micros,
        },
    }
}

/// `f32` through its own shortest decimal form, so 0.1f32 stays "0.1".
fn widen_f32(v: f32) -> f64 {
    v.to_string().parse::<f64>().unwrap_or(v as f64)
}

#[allow(clippy::too_many_arguments)]
fn raw_datetime(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
    kind: ColumnKind,
) -> String {
    if kind == ColumnKind::Date {
        return format!("{:04}-{:02}-{:02}", year, month, day);
    }
    let mut out = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year, month, day, hour, minute, second
    );
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_columns() {
        assert_eq!(
            ColumnKind::classify(ColumnType::MYSQL_TYPE_BLOB, BINARY_CHARSET),
            ColumnKind::Binary
        );
        // TEXT columns share the BLOB type code but carry a real charset.
        assert_eq!(
            ColumnKind::classify(ColumnType::MYSQL_TYPE_BLOB, 255),
            ColumnKind::Other
        );
        // DECIMAL is reported with the binary charset but is text.
        assert_eq!(
            ColumnKind::classify(ColumnType::MYSQL_TYPE_NEWDECIMAL, BINARY_CHARSET),
            ColumnKind::Other
        );
        assert_eq!(
            ColumnKind::classify(ColumnType::MYSQL_TYPE_BIT, BINARY_CHARSET),
            ColumnKind::Binary
        );
        assert_eq!(
            ColumnKind::classify(ColumnType::MYSQL_TYPE_DATE, BINARY_CHARSET),
            ColumnKind::Date
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_cell(Value::NULL, ColumnKind::Other), CellValue::Null);
        assert_eq!(to_cell(Value::Int(-5), ColumnKind::Other), CellValue::Int(-5));
        assert_eq!(to_cell(Value::UInt(5), ColumnKind::Other), CellValue::UInt(5));
        assert_eq!(
            to_cell(Value::Double(2.5), ColumnKind::Other),
            CellValue::Float(2.5)
        );
        assert_eq!(
            to_cell(Value::Float(0.1), ColumnKind::Other).to_field(),
            "0.1"
        );
    }

    #[test]
    fn test_bytes_follow_column_kind() {
        assert_eq!(
            to_cell(Value::Bytes(b"Alice".to_vec()), ColumnKind::Other),
            CellValue::Text("Alice".into())
        );
        assert_eq!(
            to_cell(Value::Bytes(b"123.45".to_vec()), ColumnKind::Other),
            CellValue::Text("123.45".into())
        );
        assert_eq!(
            to_cell(Value::Bytes(b"Alice".to_vec()), ColumnKind::Binary),
            CellValue::Blob(b"Alice".to_vec())
        );
        assert_eq!(
            to_cell(Value::Bytes(vec![0xff, 0xfe]), ColumnKind::Other),
            CellValue::Blob(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn test_temporal_values() {
        assert_eq!(
            to_cell(Value::Date(2024, 2, 29, 0, 0, 0, 0), ColumnKind::Date).to_field(),
            "2024-02-29"
        );
        assert_eq!(
            to_cell(Value::Date(2024, 2, 29, 13, 5, 9, 0), ColumnKind::Other).to_field(),
            "2024-02-29T13:05:09"
        );
        assert_eq!(
            to_cell(Value::Date(0, 0, 0, 0, 0, 0, 0), ColumnKind::Other).to_field(),
            "0000-00-00T00:00:00"
        );
        assert_eq!(
            to_cell(Value::Date(0, 0, 0, 0, 0, 0, 0), ColumnKind::Date).to_field(),
            "0000-00-00"
        );
        assert_eq!(
            to_cell(Value::Time(true, 1, 2, 3, 4, 0), ColumnKind::Other).to_field(),
            "-26:03:04"
        );
    }
}
