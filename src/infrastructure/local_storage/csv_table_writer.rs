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

//! Streams a table's header and row chunks into one delimited text file.
//!
//! Each chunk is rendered with the `csv` crate into a scratch buffer, encoded
//! into the target character set, written, and flushed before the call returns.
//! Nothing beyond the current chunk is ever held in memory.

use crate::domain::dialect::{CsvDialect, LineTerminator, Quoting};
use crate::domain::entities::Row;
use crate::domain::errors::{ExportError, Result};
use crate::infrastructure::local_storage::text_encoding::TextEncoding;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct CsvTableWriter {
    path: PathBuf,
    file: BufWriter<File>,
    builder: WriterBuilder,
    encoding: TextEncoding,
}

impl CsvTableWriter {
    /// Creates (or truncates) the output file.
    pub fn create(path: &Path, dialect: &CsvDialect, encoding: TextEncoding) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: BufWriter::with_capacity(128 * 1024, file),
            builder: writer_builder(dialect),
            encoding,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_header(&mut self, columns: &[String]) -> Result<()> {
        let mut buf = Vec::new();
        {
            let mut wtr = self.builder.from_writer(&mut buf);
            wtr.write_record(columns)?;
            wtr.flush()?;
        }
        self.write_encoded(&buf)
    }

    /// Writes every row of `rows` and flushes. Returns the number of rows written.
    pub fn write_chunk(&mut self, rows: &[Row]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut buf = Vec::new();
        {
            let mut wtr = self.builder.from_writer(&mut buf);
            for row in rows {
                for value in row {
                    let field = value.to_field();
                    wtr.write_field(field.as_bytes())?;
                }
                wtr.write_record(None::<&[u8]>)?;
            }
            wtr.flush()?;
        }
        self.write_encoded(&buf)?;
        Ok(rows.len())
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn write_encoded(&mut self, rendered: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(rendered)
            .map_err(|e| ExportError::CsvError(format!("rendered record is not UTF-8: {}", e)))?;
        let bytes = self.encoding.encode(text)?;
        self.file.write_all(&bytes)?;
        self.file.flush()?;
        Ok(())
    }
}

fn writer_builder(dialect: &CsvDialect) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .has_headers(false)
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(true)
        .quote_style(match dialect.quoting {
            Quoting::Minimal => QuoteStyle::Necessary,
            Quoting::All => QuoteStyle::Always,
        })
        .terminator(match dialect.terminator {
            LineTerminator::Lf => Terminator::Any(b'\n'),
            LineTerminator::CrLf => Terminator::CRLF,
        });
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CellValue;

    fn users_rows() -> Vec<Row> {
        vec![
            vec![CellValue::Int(1), CellValue::Text("Alice".into())],
            vec![CellValue::Int(2), CellValue::Text("Bob".into())],
        ]
    }

    fn write_users(dialect: &str, encoding: TextEncoding) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let mut writer =
            CsvTableWriter::create(&path, &CsvDialect::by_name(dialect).unwrap(), encoding)
                .unwrap();
        writer
            .write_header(&["id".to_string(), "name".to_string()])
            .unwrap();
        assert_eq!(writer.write_chunk(&users_rows()).unwrap(), 2);
        writer.finish().unwrap();
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_unix_dialect() {
        let bytes = write_users("unix", TextEncoding::utf8());
        assert_eq!(bytes, b"id,name\n1,Alice\n2,Bob\n");
    }

    #[test]
    fn test_excel_dialects() {
        assert_eq!(
            write_users("excel", TextEncoding::utf8()),
            b"id,name\r\n1,Alice\r\n2,Bob\r\n"
        );
        assert_eq!(
            write_users("excel-tab", TextEncoding::utf8()),
            b"id\tname\r\n1\tAlice\r\n2\tBob\r\n"
        );
        assert_eq!(
            write_users("unix-quote-all", TextEncoding::utf8()),
            b"\"id\",\"name\"\n\"1\",\"Alice\"\n\"2\",\"Bob\"\n"
        );
    }

    #[test]
    fn test_every_registered_dialect_quotes_as_declared() {
        for name in CsvDialect::names() {
            let dialect = CsvDialect::by_name(name).unwrap();
            let text = String::from_utf8(write_users(name, TextEncoding::utf8())).unwrap();
            let first_data_line = text.lines().nth(1).unwrap();
            match dialect.quoting {
                Quoting::Minimal => assert!(!first_data_line.contains('"'), "{}", name),
                Quoting::All => assert!(first_data_line.starts_with("\"1\""), "{}", name),
            }
        }
    }

    #[test]
    fn test_minimal_quoting_escapes_specials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        let mut writer = CsvTableWriter::create(
            &path,
            &CsvDialect::by_name("unix").unwrap(),
            TextEncoding::utf8(),
        )
        .unwrap();
        writer
            .write_chunk(&[vec![
                CellValue::Text("a,b".into()),
                CellValue::Text("say \"hi\"".into()),
                CellValue::Text("two\nlines".into()),
                CellValue::Null,
            ]])
            .unwrap();
        writer.finish().unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\",\n"
        );
    }

    #[test]
    fn test_configured_encoding_applies_to_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        let mut writer = CsvTableWriter::create(
            &path,
            &CsvDialect::by_name("unix").unwrap(),
            TextEncoding::for_label("latin1").unwrap(),
        )
        .unwrap();
        writer.write_header(&["name".to_string()]).unwrap();
        writer
            .write_chunk(&[vec![CellValue::Text("Zürich".into())]])
            .unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"name\nZ\xfcrich\n");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "stale contents that are longer\n").unwrap();
        let mut writer = CsvTableWriter::create(
            &path,
            &CsvDialect::by_name("unix").unwrap(),
            TextEncoding::utf8(),
        )
        .unwrap();
        writer.write_header(&["x".to_string()]).unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn test_chunk_is_on_disk_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut writer = CsvTableWriter::create(
            &path,
            &CsvDialect::by_name("unix").unwrap(),
            TextEncoding::utf8(),
        )
        .unwrap();
        writer.write_header(&["x".to_string()]).unwrap();
        writer.write_chunk(&[vec![CellValue::Int(7)]]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n7\n");
        assert_eq!(writer.path(), path.as_path());
        writer.finish().unwrap();
    }
}
