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

//! # Logging Backend
//!
//! Library code logs through the `log` facade. This module provides the
//! backend the `duql` binary installs: console and file handlers with text
//! or JSON formatting, configured by [`DuqlLogConfig`].
//!
//! ```rust
//! use duql::logging::{DuqlLogConfig, DuqlLogger};
//!
//! DuqlLogger::init(DuqlLogConfig::default()).unwrap();
//! log::info!("ready");
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::DuqlLogConfig;
pub use self::core::{DuqlLogRecord, DuqlLogger};
pub use self::formatters::{DuqlJsonFormatter, DuqlTextFormatter};
pub use self::handlers::{DuqlConsoleHandler, DuqlFileHandler, DuqlLogHandler};
