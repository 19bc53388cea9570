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

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::logging::core::DuqlLogRecord;
use crate::logging::formatters::{DuqlJsonFormatter, DuqlTextFormatter};

pub trait DuqlLogHandler {
    fn handle(&self, record: &DuqlLogRecord);

    fn flush(&self) {}
}

fn render(record: &DuqlLogRecord, json: bool) -> String {
    if json {
        DuqlJsonFormatter::format(record)
    } else {
        DuqlTextFormatter::format(record)
    }
}

/// Writes to stderr so stdout stays free for command output.
pub struct DuqlConsoleHandler {
    json: bool,
}

impl DuqlConsoleHandler {
    pub fn new(json: bool) -> Self {
        DuqlConsoleHandler { json }
    }
}

impl DuqlLogHandler for DuqlConsoleHandler {
    fn handle(&self, record: &DuqlLogRecord) {
        let line = render(record, self.json);
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Appends one line per record to a file.
pub struct DuqlFileHandler {
    path: PathBuf,
    json: bool,
    file: Mutex<()>,
}

impl DuqlFileHandler {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        DuqlFileHandler {
            path: path.into(),
            json,
            file: Mutex::new(()),
        }
    }
}

impl DuqlLogHandler for DuqlFileHandler {
    fn handle(&self, record: &DuqlLogRecord) {
        let Ok(_guard) = self.file.lock() else {
            return;
        };
        let line = render(record, self.json);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
