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

//! Character encoding of the output byte stream.
//!
//! Labels follow the WHATWG Encoding Standard (`utf8`, `latin1`, `cp1252`,
//! `shift_jis`, ...). Note that `latin1` and `ascii` both resolve to
//! windows-1252 under that standard.

use crate::domain::errors::{ExportError, Result};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy)]
pub struct TextEncoding {
    encoding: &'static Encoding,
}

impl TextEncoding {
    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    /// Resolves an encoding label. Only encodings we can also *write* are accepted.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ExportError::ConfigError(format!("unknown character encoding {:?}", label))
        })?;
        // encoding_rs writes UTF-16 and "replacement" as UTF-8.
        if encoding.output_encoding() != encoding {
            return Err(ExportError::ConfigError(format!(
                "character encoding {:?} ({}) is not supported for output",
                label,
                encoding.name()
            )));
        }
        Ok(Self { encoding })
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encodes `text`, failing on the first character the target cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            let offending = text
                .chars()
                .find(|c| {
                    let mut buf = [0u8; 4];
                    self.encoding.encode(c.encode_utf8(&mut buf)).2
                })
                .map(|c| format!("{:?}", c))
                .unwrap_or_else(|| "a character".to_string());
            return Err(ExportError::EncodingError(format!(
                "{} cannot be represented in {}",
                offending,
                self.encoding.name()
            )));
        }
        Ok(bytes)
    }
}
