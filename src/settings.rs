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
use crate::node::{
    describe, expect_mapping, expect_string, field, untag, warn_unknown_keys, DuqlNodePath,
};

/// SQL dialect a document is meant to be compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DuqlTargetDialect {
    ClickHouse,
    DuckDb,
    Generic,
    GlareDb,
    MySql,
    Postgres,
    Sqlite,
}

impl DuqlTargetDialect {
    pub const ALL: [DuqlTargetDialect; 7] = [
        DuqlTargetDialect::ClickHouse,
        DuqlTargetDialect::DuckDb,
        DuqlTargetDialect::Generic,
        DuqlTargetDialect::GlareDb,
        DuqlTargetDialect::MySql,
        DuqlTargetDialect::Postgres,
        DuqlTargetDialect::Sqlite,
    ];

    /// Bare dialect name, e.g. `postgres`.
    pub fn name(&self) -> &'static str {
        match self {
            DuqlTargetDialect::ClickHouse => "clickhouse",
            DuqlTargetDialect::DuckDb => "duckdb",
            DuqlTargetDialect::Generic => "generic",
            DuqlTargetDialect::GlareDb => "glaredb",
            DuqlTargetDialect::MySql => "mysql",
            DuqlTargetDialect::Postgres => "postgres",
            DuqlTargetDialect::Sqlite => "sqlite",
        }
    }
}

/// Canonical form is the qualified `sql.<name>` identifier.
impl fmt::Display for DuqlTargetDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sql.{}", self.name())
    }
}

impl FromStr for DuqlTargetDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bare = s.strip_prefix("sql.").unwrap_or(s);
        DuqlTargetDialect::ALL
            .iter()
            .copied()
            .find(|d| d.name() == bare)
            .ok_or_else(|| format!("unsupported target dialect '{}'", s))
    }
}

/// Document-level metadata. Both fields are optional and independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuqlSettings {
    pub version: Option<String>,
    pub target: Option<DuqlTargetDialect>,
}

impl DuqlSettings {
    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = expect_mapping(value, path)?;
        warn_unknown_keys(map, &["version", "target"], path);

        // `version: 1.2` arrives as a number; keep its textual form
        let version = match field(map, "version").map(untag) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(DuqlError::shape(
                    path.key("version"),
                    "string",
                    describe(other),
                ))
            }
            None => None,
        };

        let target = match field(map, "target") {
            Some(v) => {
                let raw = expect_string(v, &path.key("target"))?;
                Some(raw.parse::<DuqlTargetDialect>().map_err(|_| {
                    DuqlError::shape(
                        path.key("target"),
                        "a supported sql dialect",
                        format!("'{}'", raw),
                    )
                })?)
            }
            None => None,
        };

        Ok(DuqlSettings { version, target })
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.target.is_none()
    }

    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        if let Some(version) = &self.version {
            map.insert("version".into(), Value::String(version.clone()));
        }
        if let Some(target) = &self.target {
            map.insert("target".into(), Value::String(target.to_string()));
        }
        Value::Mapping(map)
    }
}
