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

use crate::dataset::DuqlDataset;
use crate::errors::{DuqlError, Result};
use crate::expression::DuqlExpression;
use crate::node::{expect_mapping, expect_string, field, warn_unknown_keys, DuqlNodePath};
use crate::steps::{DuqlStep, DuqlStepNode};

pub const TAG: &str = "join";

/// Which side's unmatched rows a join retains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuqlJoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl DuqlJoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuqlJoinType::Inner => "inner",
            DuqlJoinType::Left => "left",
            DuqlJoinType::Right => "right",
            DuqlJoinType::Full => "full",
        }
    }
}

impl fmt::Display for DuqlJoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuqlJoinType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "inner" => Ok(DuqlJoinType::Inner),
            "left" => Ok(DuqlJoinType::Left),
            "right" => Ok(DuqlJoinType::Right),
            "full" => Ok(DuqlJoinType::Full),
            other => Err(format!("unsupported join type '{}'", other)),
        }
    }
}

/// Joins another dataset on a predicate.
///
/// ```yaml
/// join:
///   dataset: customers
///   where: orders.customer_id == customers.id
///   retain: left
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlJoin {
    pub dataset: DuqlDataset,
    pub predicate: DuqlExpression,
    pub retain: DuqlJoinType,
}

impl DuqlJoin {
    pub fn new(dataset: DuqlDataset, predicate: DuqlExpression) -> Self {
        Self {
            dataset,
            predicate,
            retain: DuqlJoinType::default(),
        }
    }

    pub fn retain(mut self, retain: DuqlJoinType) -> Self {
        self.retain = retain;
        self
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = expect_mapping(value, path)?;
        warn_unknown_keys(map, &["dataset", "where", "retain"], path);

        let dataset_path = path.key("dataset");
        let dataset = match field(map, "dataset") {
            Some(v) => DuqlDataset::decode(v, &dataset_path)?,
            None => return Err(DuqlError::missing(dataset_path.to_string())),
        };

        let where_path = path.key("where");
        let predicate = match map.get("where") {
            Some(v) => DuqlExpression::decode(v, &where_path)?,
            None => return Err(DuqlError::missing(where_path.to_string())),
        };

        let retain = match field(map, "retain") {
            Some(v) => {
                let raw = expect_string(v, &path.key("retain"))?;
                raw.parse::<DuqlJoinType>().map_err(|_| {
                    DuqlError::shape(
                        path.key("retain"),
                        "one of inner, left, right, full",
                        format!("'{}'", raw),
                    )
                })?
            }
            None => DuqlJoinType::Inner,
        };

        Ok(Self {
            dataset,
            predicate,
            retain,
        })
    }
}

impl DuqlStepNode for DuqlJoin {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    // key correctness belongs to the compiler
    fn validate(&self) -> Result<()> {
        self.predicate.validate()
    }

    fn payload(&self) -> Value {
        let mut map = Mapping::new();
        map.insert("dataset".into(), self.dataset.to_value());
        map.insert("where".into(), self.predicate.to_value());
        map.insert("retain".into(), Value::String(self.retain.to_string()));
        Value::Mapping(map)
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlJoin::decode(value, path).map(DuqlStep::Join)
}
