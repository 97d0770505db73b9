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

//! # Configuration
//!
//! Settings come from four layers, highest priority first:
//! 1. command-line flags,
//! 2. environment variables (`DB_HOST`, `CHUNK_SIZE`, ...),
//! 3. an optional YAML/JSON file given with `--config`,
//! 4. built-in defaults.
//!
//! `clap` folds layers 1 and 2 together for valued options. The paired boolean
//! switches are resolved by hand because their environment values use a more
//! permissive truth table than clap's (see [`parse_bool`]).

use crate::domain::dialect::{quoted_list, CsvDialect};
use crate::domain::errors::{ExportError, Result};
use crate::infrastructure::local_storage::text_encoding::TextEncoding;
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Accepted `--loglevel` values.
pub const LOG_LEVEL_CHOICES: &[&str] = &[
    "CRITICAL", "FATAL", "ERROR", "WARN", "WARNING", "INFO", "DEBUG", "TRACE", "OFF",
];

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
    pub log_level: String,
    /// Tables to export, in order. Only ever set from the command line.
    #[serde(skip)]
    pub tables: Vec<String>,
}

#[derive(Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Connect without any password; `password` is ignored.
    pub no_password: bool,
    pub database: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    #[serde(alias = "path")]
    pub output_dir: PathBuf,
    pub chunksize: usize,
    pub csv_dialect: String,
    pub csv_encoding: String,
    pub overwrite: bool,
    pub defer_exceptions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            export: ExportConfig::default(),
            log_level: "INFO".to_string(),
            tables: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "password".to_string(),
            no_password: false,
            database: "root".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            chunksize: 1000,
            csv_dialect: "unix".to_string(),
            csv_encoding: "utf8".to_string(),
            overwrite: false,
            defer_exceptions: false,
        }
    }
}

impl DatabaseConfig {
    /// The password to authenticate with, or `None` for a password-less login.
    pub fn password(&self) -> Option<&str> {
        if self.no_password {
            None
        } else {
            Some(&self.password)
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("no_password", &self.no_password)
            .field("database", &self.database)
            .finish()
    }
}

impl ExportConfig {
    pub fn dialect(&self) -> Result<CsvDialect> {
        CsvDialect::by_name(&self.csv_dialect)
    }

    pub fn encoding(&self) -> Result<TextEncoding> {
        TextEncoding::for_label(&self.csv_encoding)
    }
}

const REDACTED: &str = "-REDACTED-";

#[derive(Parser, Debug)]
#[command(
    name = "mysql2csv",
    author,
    version,
    about = "generates CSV files from MySQL/MariaDB database tables",
    long_about = None
)]
pub struct CliArgs {
    /// Path to configuration file (YAML, or JSON when it ends in .json)
    #[arg(short, long)]
    pub config: Option<String>,

    /// How verbosely to log: CRITICAL, FATAL, ERROR, WARN, WARNING, INFO, DEBUG, TRACE, OFF [default: INFO]
    #[arg(long, env = "LOG_LEVEL", value_name = "LOG_LEVEL")]
    pub loglevel: Option<String>,

    /// Network host to use when connecting to the database [default: 127.0.0.1]
    #[arg(long, env = "DB_HOST", value_name = "DB_HOST")]
    pub host: Option<String>,

    /// TCP port of the database server [default: 3306]
    #[arg(long, env = "DB_PORT", value_name = "DB_PORT")]
    pub port: Option<u16>,

    /// Username to use when connecting to the database [default: root]
    #[arg(long, env = "DB_USER", value_name = "DB_USER")]
    pub user: Option<String>,

    /// Password to use when connecting to the database
    #[arg(long, env = "DB_PASSWORD", value_name = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connect without a password (distinct from an empty password); overrides --password
    #[arg(long)]
    pub no_password: bool,

    /// Database name to use after connecting [default: root]
    #[arg(long, env = "DB_DATABASE", value_name = "DB_DATABASE")]
    pub database: Option<String>,

    /// Base output directory for the CSV files [default: current directory]
    #[arg(long, env = "OUTPUT_PATH", value_name = "OUTPUT_PATH")]
    pub path: Option<PathBuf>,

    /// Rows fetched per round trip; larger is faster but uses more memory [default: 1000]
    #[arg(long, env = "CHUNK_SIZE", value_name = "CHUNK_SIZE")]
    pub chunksize: Option<usize>,

    /// CSV dialect: "excel", "excel-tab", "unix", "unix-quote-all" [default: unix]
    #[arg(long, env = "CSV_DIALECT", value_name = "CSV_DIALECT")]
    pub csvdialect: Option<String>,

    /// Character encoding of the CSV files [default: utf8]
    #[arg(long, env = "CSV_ENCODING", value_name = "CSV_ENCODING")]
    pub csvencoding: Option<String>,

    /// Replace output files that already exist instead of skipping those tables
    #[arg(long, overrides_with = "no_overwrite")]
    pub overwrite: bool,

    #[arg(long, overrides_with = "overwrite")]
    pub no_overwrite: bool,

    /// Keep going after a database error and report all errors at the end
    #[arg(long, overrides_with = "no_defer_exceptions")]
    pub defer_exceptions: bool,

    #[arg(long, overrides_with = "defer_exceptions")]
    pub no_defer_exceptions: bool,

    /// Database table(s) to copy into local CSV files
    #[arg(required = true, num_args = 1.., value_name = "TABLE_NAME")]
    pub table_name: Vec<String>,
}

/// Truth table for boolean environment variables.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "enable" | "on" | "true" | "y" | "yes"
    )
}

/// Maps a level name onto the `log` crate's filter.
pub fn parse_log_level(value: &str) -> Result<LevelFilter> {
    match value.trim().to_uppercase().as_str() {
        "CRITICAL" | "FATAL" | "ERROR" => Ok(LevelFilter::Error),
        "WARN" | "WARNING" => Ok(LevelFilter::Warn),
        "INFO" => Ok(LevelFilter::Info),
        "DEBUG" => Ok(LevelFilter::Debug),
        "TRACE" => Ok(LevelFilter::Trace),
        "OFF" => Ok(LevelFilter::Off),
        _ => Err(ExportError::ConfigError(format!(
            "unknown log level {:?}; possible values: {}",
            value,
            quoted_list(LOG_LEVEL_CHOICES.iter().copied())
        ))),
    }
}

/// Flag pair first, then the environment variable, then "not given".
fn resolve_switch(
    on: bool,
    off: bool,
    env_key: &str,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        env(env_key).map(|v| parse_bool(&v))
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ExportError::ConfigError(format!("cannot open {}: {}", path, e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(format!("{}: {}", path, e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(format!("{}: {}", path, e)))?
        };

        Ok(config)
    }

    /// Builds the effective configuration for a run from parsed arguments.
    pub fn load(args: &CliArgs) -> Result<Self> {
        Self::load_with_env(args, &|key| std::env::var(key).ok())
    }

    fn load_with_env(args: &CliArgs, env: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_cli(args, env);
        config.validate()?;
        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs, env: &dyn Fn(&str) -> Option<String>) {
        if let Some(l) = &args.loglevel { self.log_level = l.clone(); }
        if let Some(h) = &args.host { self.database.host = h.clone(); }
        if let Some(p) = args.port { self.database.port = p; }
        if let Some(u) = &args.user { self.database.user = u.clone(); }
        if let Some(p) = &args.password { self.database.password = p.clone(); }
        if let Some(d) = &args.database { self.database.database = d.clone(); }
        if let Some(o) = &args.path { self.export.output_dir = o.clone(); }
        if let Some(c) = args.chunksize { self.export.chunksize = c; }
        if let Some(d) = &args.csvdialect { self.export.csv_dialect = d.clone(); }
        if let Some(e) = &args.csvencoding { self.export.csv_encoding = e.clone(); }

        if let Some(b) = resolve_switch(args.no_password, false, "NO_PASSWORD", env) {
            self.database.no_password = b;
        }
        if let Some(b) = resolve_switch(args.overwrite, args.no_overwrite, "OVERWRITE", env) {
            self.export.overwrite = b;
        }
        if let Some(b) = resolve_switch(
            args.defer_exceptions,
            args.no_defer_exceptions,
            "DEFER_EXCEPTIONS",
            env,
        ) {
            self.export.defer_exceptions = b;
        }

        self.tables = args.table_name.clone();
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.chunksize == 0 {
            return Err(ExportError::ConfigError(
                "chunksize must be at least 1".to_string(),
            ));
        }
        if self.tables.is_empty() {
            return Err(ExportError::ConfigError(
                "at least one table name is required".to_string(),
            ));
        }
        self.export.dialect()?;
        self.export.encoding()?;
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        parse_log_level(&self.log_level)
    }

    /// `(key, value)` pairs for the start-up config report, password redacted.
    pub fn report_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("loglevel", self.log_level.clone()),
            ("host", self.database.host.clone()),
            ("port", self.database.port.to_string()),
            ("user", self.database.user.clone()),
            ("password", REDACTED.to_string()),
            ("no_password", self.database.no_password.to_string()),
            ("database", self.database.database.clone()),
            ("path", self.export.output_dir.display().to_string()),
            ("chunksize", self.export.chunksize.to_string()),
            ("csvdialect", self.export.csv_dialect.clone()),
            ("csvencoding", self.export.csv_encoding.clone()),
            ("overwrite", self.export.overwrite.to_string()),
            ("defer_exceptions", self.export.defer_exceptions.to_string()),
            ("table_name", self.tables.join(", ")),
        ]
    }
}
