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

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Configuration for [`DuqlLogger`](super::DuqlLogger): threshold level,
/// console enablement and format, optional append-only log file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuqlLogConfig {
    pub default_level: String,
    pub console_enabled: bool,
    pub json_format_console: bool,
    /// Whether file logging is enabled.
    pub file_enabled: bool,
    /// Log file path when file logging is enabled.
    pub file_path: Option<String>,
    /// Whether the file handler writes JSON lines.
    pub json_format_file: bool,
}

impl Default for DuqlLogConfig {
    fn default() -> Self {
        DuqlLogConfig {
            default_level: "INFO".to_string(),
            console_enabled: true,
            json_format_console: false,
            file_enabled: false,
            file_path: None,
            json_format_file: true,
        }
    }
}

impl DuqlLogConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    pub fn with_json_console(mut self, json: bool) -> Self {
        self.json_format_console = json;
        self
    }

    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.file_enabled = true;
        self.file_path = Some(path.into());
        self
    }

    /// Threshold as a `log` filter. Unknown names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.default_level.to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "ERROR" => LevelFilter::Error,
            "WARN" | "WARNING" => LevelFilter::Warn,
            "INFO" => LevelFilter::Info,
            "DEBUG" => LevelFilter::Debug,
            "TRACE" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}
