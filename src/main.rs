//! # mysql2csv
//!
//! Dumps whole MySQL/MariaDB tables to one CSV file per table, streaming rows
//! in fixed-size chunks so memory stays flat regardless of table size.
//!
//! Layout follows ports and adapters: `domain` holds the pure types, `ports`
//! the seams, `infrastructure` the MySQL, filesystem and logging adapters, and
//! `application` the export loop that ties them together.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use crate::application::orchestrator::ExportOrchestrator;
use crate::application::runtime::RunContext;
use crate::application::table_exporter::ExportOptions;
use crate::config::{AppConfig, CliArgs};
use crate::domain::errors::Result;
use crate::domain::events::ExportEvent;
use crate::infrastructure::logging::init_logger;
use crate::infrastructure::mysql::connection_manager::MySqlConnectionManager;
use clap::Parser;
use log::{error, info};
use std::process;

fn main() {
    // 1. Parse arguments and resolve configuration
    let args = CliArgs::parse();
    let config = match AppConfig::load(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // 2. Initialize logging at the configured level
    let level = match config.log_level() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    init_logger(level);

    info!("--- Begin Config Report ---");
    for (key, value) in config.report_entries() {
        info!("\"{}\": \"{}\"", key, value);
    }
    info!("--- End Config Report ---");

    // 3. Run; the connection is closed before the exit code is returned
    let code = match run(&config, level) {
        Ok(code) => code,
        Err(e) => {
            error!("Export failed: {}", e);
            1
        }
    };
    process::exit(code);
}

fn run(config: &AppConfig, level: log::LevelFilter) -> Result<i32> {
    let options = ExportOptions::from_config(&config.export)?;
    let ctx = RunContext::with_log_sink(level);

    let manager = MySqlConnectionManager::new(&config.database);
    let mut source = manager.connect(&ctx)?;

    let orchestrator = ExportOrchestrator::new(options, ctx);
    let outcome = orchestrator.run(&mut source, &config.tables);

    drop(source);
    orchestrator.ctx().emit(ExportEvent::ConnectionClosed {
        endpoint: manager.endpoint(),
    });

    Ok(outcome?.exit_code())
}
