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

use std::fmt;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, Result};
use crate::node::{describe, expect_string, field, untag, warn_unknown_keys, DuqlNodePath};

/// Storage format of a structured dataset reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DuqlDataFormat {
    Table,
    Csv,
    Json,
    Parquet,
}

impl DuqlDataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuqlDataFormat::Table => "table",
            DuqlDataFormat::Csv => "csv",
            DuqlDataFormat::Json => "json",
            DuqlDataFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for DuqlDataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuqlDataFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(DuqlDataFormat::Table),
            "csv" => Ok(DuqlDataFormat::Csv),
            "json" => Ok(DuqlDataFormat::Json),
            "parquet" => Ok(DuqlDataFormat::Parquet),
            other => Err(format!("unsupported data format '{}'", other)),
        }
    }
}

/// Source relation of a query or join: a bare name or a structured
/// descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuqlDataset {
    Simple(String),
    Complex {
        name: String,
        format: Option<DuqlDataFormat>,
    },
}

impl Default for DuqlDataset {
    fn default() -> Self {
        DuqlDataset::Simple(String::new())
    }
}

impl DuqlDataset {
    pub fn simple(name: impl Into<String>) -> Self {
        DuqlDataset::Simple(name.into())
    }

    pub fn complex(name: impl Into<String>, format: Option<DuqlDataFormat>) -> Self {
        DuqlDataset::Complex {
            name: name.into(),
            format,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DuqlDataset::Simple(name) => name,
            DuqlDataset::Complex { name, .. } => name,
        }
    }

    /// The zero value of either arm: no usable relation name.
    pub fn is_empty(&self) -> bool {
        self.name().is_empty()
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        match untag(value) {
            Value::Null => Ok(DuqlDataset::default()),
            Value::String(name) => Ok(DuqlDataset::Simple(name.clone())),
            Value::Mapping(map) => {
                warn_unknown_keys(map, &["name", "format"], path);
                let name = match field(map, "name") {
                    Some(v) => expect_string(v, &path.key("name"))?,
                    None => String::new(),
                };
                let format = match field(map, "format") {
                    Some(v) => {
                        let raw = expect_string(v, &path.key("format"))?;
                        Some(raw.parse::<DuqlDataFormat>().map_err(|_| {
                            DuqlError::shape(
                                path.key("format"),
                                "one of table, csv, json, parquet",
                                format!("'{}'", raw),
                            )
                        })?)
                    }
                    None => None,
                };
                Ok(DuqlDataset::Complex { name, format })
            }
            other => Err(DuqlError::shape(path, "string or mapping", describe(other))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DuqlDataset::Simple(name) => Value::String(name.clone()),
            DuqlDataset::Complex { name, format } => {
                let mut map = Mapping::new();
                map.insert("name".into(), Value::String(name.clone()));
                if let Some(format) = format {
                    map.insert("format".into(), Value::String(format.to_string()));
                }
                Value::Mapping(map)
            }
        }
    }
}
