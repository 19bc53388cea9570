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

use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, Result};
use crate::node::{
    describe, expect_mapping, expect_string, field, untag, warn_unknown_keys, DuqlNodePath,
};
use crate::steps::{decode_steps, encode_steps, validate_steps, DuqlStep, DuqlStepNode, DuqlSteps};

pub const TAG: &str = "window";

/// Runs a nested pipeline over a sliding or expanding frame.
///
/// No combination rule between `rows`, `range`, `expanding` and `rolling`
/// is enforced here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlWindow {
    pub rows: Option<String>,
    pub range: Option<String>,
    pub expanding: bool,
    /// Rolling frame size; 0 means unset.
    pub rolling: u64,
    pub steps: DuqlSteps,
}

impl DuqlWindow {
    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = expect_mapping(value, path)?;
        warn_unknown_keys(map, &["rows", "range", "expanding", "rolling", "steps"], path);

        let rows = field(map, "rows")
            .map(|v| expect_string(v, &path.key("rows")))
            .transpose()?;
        let range = field(map, "range")
            .map(|v| expect_string(v, &path.key("range")))
            .transpose()?;

        let expanding = match field(map, "expanding").map(untag) {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(DuqlError::shape(
                    path.key("expanding"),
                    "boolean",
                    describe(other),
                ))
            }
            None => false,
        };

        let rolling = match field(map, "rolling").map(untag) {
            Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
                DuqlError::shape(path.key("rolling"), "non-negative integer", n.to_string())
            })?,
            Some(other) => {
                return Err(DuqlError::shape(
                    path.key("rolling"),
                    "non-negative integer",
                    describe(other),
                ))
            }
            None => 0,
        };

        let steps = match field(map, "steps") {
            Some(v) => decode_steps(v, &path.key("steps"))?,
            None => Vec::new(),
        };

        Ok(Self {
            rows,
            range,
            expanding,
            rolling,
            steps,
        })
    }
}

impl DuqlStepNode for DuqlWindow {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    fn validate(&self) -> Result<()> {
        validate_steps(&self.steps, Some(TAG))
    }

    fn payload(&self) -> Value {
        let mut map = Mapping::new();
        if let Some(rows) = &self.rows {
            map.insert("rows".into(), Value::String(rows.clone()));
        }
        if let Some(range) = &self.range {
            map.insert("range".into(), Value::String(range.clone()));
        }
        if self.expanding {
            map.insert("expanding".into(), Value::Bool(true));
        }
        if self.rolling != 0 {
            map.insert("rolling".into(), Value::Number(self.rolling.into()));
        }
        map.insert("steps".into(), encode_steps(&self.steps));
        Value::Mapping(map)
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlWindow::decode(value, path).map(DuqlStep::Window)
}
