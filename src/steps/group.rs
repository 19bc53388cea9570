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
use crate::node::{expect_mapping, field, warn_unknown_keys, DuqlNodePath};
use crate::steps::{decode_steps, encode_steps, validate_steps, DuqlStep, DuqlStepNode, DuqlSteps};

pub const TAG: &str = "group";

/// Runs a nested pipeline once per group of rows sharing `by`.
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlGroup {
    /// Grouping key, kept verbatim (a column, a list, or a mapping).
    pub by: Value,
    pub steps: DuqlSteps,
}

impl DuqlGroup {
    pub fn new(by: Value, steps: DuqlSteps) -> Self {
        Self { by, steps }
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = expect_mapping(value, path)?;
        warn_unknown_keys(map, &["by", "steps"], path);

        let by = field(map, "by")
            .cloned()
            .ok_or_else(|| DuqlError::missing(path.key("by").to_string()))?;
        let steps = match field(map, "steps") {
            Some(v) => decode_steps(v, &path.key("steps"))?,
            None => Vec::new(),
        };
        Ok(Self { by, steps })
    }
}

impl DuqlStepNode for DuqlGroup {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    fn validate(&self) -> Result<()> {
        validate_steps(&self.steps, Some(TAG))
    }

    fn payload(&self) -> Value {
        let mut map = Mapping::new();
        map.insert("by".into(), self.by.clone());
        if !self.steps.is_empty() {
            map.insert("steps".into(), encode_steps(&self.steps));
        }
        Value::Mapping(map)
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlGroup::decode(value, path).map(DuqlStep::Group)
}
