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

//! # Compiler Seam
//!
//! Translating a validated [`DuqlQuery`] into SQL belongs to a downstream
//! component. This module fixes the interface that component implements
//! ([`DuqlCompiler`]) and ships [`DuqlCanonicalCompiler`], which re-emits
//! the query in its canonical document form. `duql generate` uses it until
//! a SQL backend is plugged in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::query::DuqlQuery;

/// Pure translation of a validated query into an artifact.
pub trait DuqlCompiler {
    type Artifact;

    fn compile(&self, query: &DuqlQuery) -> Result<Self::Artifact>;
}

/// Text encoding of the canonical artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuqlOutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for DuqlOutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuqlOutputFormat::Yaml => f.write_str("yaml"),
            DuqlOutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for DuqlOutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(DuqlOutputFormat::Yaml),
            "json" => Ok(DuqlOutputFormat::Json),
            other => Err(format!("unsupported output format '{}'", other)),
        }
    }
}

/// Re-emits the canonical document.
#[derive(Clone, Debug, Default)]
pub struct DuqlCanonicalCompiler {
    format: DuqlOutputFormat,
}

impl DuqlCanonicalCompiler {
    pub fn new(format: DuqlOutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> DuqlOutputFormat {
        self.format
    }
}

impl DuqlCompiler for DuqlCanonicalCompiler {
    type Artifact = String;

    fn compile(&self, query: &DuqlQuery) -> Result<String> {
        match self.format {
            DuqlOutputFormat::Yaml => query.to_yaml_string(),
            DuqlOutputFormat::Json => query.to_json_string(),
        }
    }
}
