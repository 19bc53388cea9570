//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of DUQL.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Value};

use crate::errors::{DuqlError, Result};
use crate::logging::config::DuqlLogConfig;
use crate::logging::handlers::{DuqlConsoleHandler, DuqlFileHandler, DuqlLogHandler};

/// One formatted-agnostic log event.
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlLogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl DuqlLogRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            target: target.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// ISO-8601 timestamp with millisecond precision.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "timestamp": self.timestamp_iso(),
            "level": self.level.as_str(),
            "target": self.target,
            "message": self.message,
        })
    }
}

static LOGGER: OnceLock<DuqlLogger> = OnceLock::new();

/// `log::Log` implementation fanning records out to handlers.
pub struct DuqlLogger {
    level: LevelFilter,
    handlers: Vec<Box<dyn DuqlLogHandler + Send + Sync>>,
}

impl std::fmt::Debug for DuqlLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuqlLogger")
            .field("level", &self.level)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl DuqlLogger {
    pub fn from_config(config: &DuqlLogConfig) -> Self {
        let mut handlers: Vec<Box<dyn DuqlLogHandler + Send + Sync>> = Vec::new();
        if config.console_enabled {
            handlers.push(Box::new(DuqlConsoleHandler::new(config.json_format_console)));
        }
        if config.file_enabled {
            if let Some(path) = &config.file_path {
                handlers.push(Box::new(DuqlFileHandler::new(path, config.json_format_file)));
            }
        }
        Self {
            level: config.level_filter(),
            handlers,
        }
    }

    /// Installs the global logger. Safe to call multiple times; the first
    /// call wins.
    pub fn init(config: DuqlLogConfig) -> Result<()> {
        if LOGGER.get().is_some() {
            return Ok(());
        }
        let logger = LOGGER.get_or_init(|| DuqlLogger::from_config(&config));
        log::set_logger(logger)
            .map_err(|e| DuqlError::internal(format!("failed to install logger: {}", e)))?;
        log::set_max_level(logger.level);
        Ok(())
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Sends a record to every handler, bypassing the facade.
    pub fn emit(&self, record: &DuqlLogRecord) {
        if record.level > self.level {
            return;
        }
        for handler in &self.handlers {
            handler.handle(record);
        }
    }
}

impl Log for DuqlLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let record = DuqlLogRecord::new(
            record.level(),
            record.target(),
            record.args().to_string(),
        );
        self.emit(&record);
    }

    fn flush(&self) {
        for handler in &self.handlers {
            handler.flush();
        }
    }
}
