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

//! # Query Aggregate
//!
//! A DUQL document decodes into one [`DuqlQuery`]:
//!
//! ```yaml
//! settings:
//!   version: "0.0.1"
//!   target: sql.postgres
//! declare:
//!   min_total: 100
//! dataset: orders
//! steps:
//!   - filter: total > min_total
//!   - sort: created_at
//!   - take: 10
//! into: top_orders
//! ```
//!
//! Decoding goes text -> `serde_yaml::Value` -> typed tree. Validation is a
//! separate fail-fast walk over the typed tree.

use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::dataset::DuqlDataset;
use crate::declare::DuqlDeclare;
use crate::errors::{DuqlError, DuqlResultExt, Result};
use crate::node::{expect_mapping, expect_string, field, untag, warn_unknown_keys, DuqlNodePath};
use crate::settings::DuqlSettings;
use crate::steps::{decode_steps, encode_steps, validate_steps, DuqlSteps};

const TOP_LEVEL_KEYS: [&str; 5] = ["settings", "declare", "dataset", "steps", "into"];

/// Root of a decoded document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlQuery {
    pub settings: Option<DuqlSettings>,
    pub declare: Option<DuqlDeclare>,
    pub dataset: DuqlDataset,
    pub steps: DuqlSteps,
    pub into: Option<String>,
}

impl DuqlQuery {
    pub fn new(dataset: DuqlDataset) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    /// Decodes a document from YAML (or JSON) text without validating it.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(source)?;
        Self::from_value(&value)
    }

    /// Like [`DuqlQuery::from_yaml_str`] for a raw byte buffer.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let source = std::str::from_utf8(raw)
            .map_err(|e| DuqlError::Syntax(format!("document is not valid UTF-8: {}", e)))?;
        Self::from_yaml_str(source)
    }

    /// Decodes an already parsed document tree. An empty document decodes
    /// to a query without a dataset, which validation rejects.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = DuqlNodePath::root();
        if matches!(untag(value), Value::Null) {
            return Ok(Self::default());
        }
        let map = expect_mapping(value, &root)?;
        warn_unknown_keys(map, &TOP_LEVEL_KEYS, &root);

        let settings = field(map, "settings")
            .map(|v| DuqlSettings::decode(v, &root.key("settings")))
            .transpose()?;
        let declare = field(map, "declare")
            .map(|v| DuqlDeclare::decode(v, &root.key("declare")))
            .transpose()?;
        let dataset = match map.get("dataset") {
            Some(v) => DuqlDataset::decode(v, &root.key("dataset"))?,
            None => DuqlDataset::default(),
        };
        let steps = match field(map, "steps") {
            Some(v) => decode_steps(v, &root.key("steps"))?,
            None => Vec::new(),
        };
        let into = field(map, "into")
            .map(|v| expect_string(v, &root.key("into")))
            .transpose()?;

        Ok(Self {
            settings,
            declare,
            dataset,
            steps,
            into,
        })
    }

    /// Fail-fast structural validation: dataset, then declarations in
    /// order, then steps in order.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.is_empty() {
            return Err(DuqlError::missing("dataset"));
        }
        if let Some(declare) = &self.declare {
            declare.validate()?;
        }
        validate_steps(&self.steps, None).context("steps")
    }

    /// Canonical document tree; decoding it yields an equal query.
    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        if let Some(settings) = &self.settings {
            map.insert("settings".into(), settings.to_value());
        }
        if let Some(declare) = &self.declare {
            map.insert("declare".into(), declare.to_value());
        }
        map.insert("dataset".into(), self.dataset.to_value());
        if !self.steps.is_empty() {
            map.insert("steps".into(), encode_steps(&self.steps));
        }
        if let Some(into) = &self.into {
            map.insert("into".into(), Value::String(into.clone()));
        }
        Value::Mapping(map)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_value())?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for DuqlQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
