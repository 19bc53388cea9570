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

use serde_yaml::Value;

use crate::errors::Result;
use crate::node::{int_or_string, DuqlNodePath, DuqlTakeSpec};
use crate::steps::{DuqlStep, DuqlStepNode};

pub const TAG: &str = "take";

/// Limits rows by count (`take: 10`) or by range (`take: 5..15`).
///
/// Exactly one form is ever populated since the decoder picks it from the
/// node type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuqlTake {
    pub spec: DuqlTakeSpec,
}

impl DuqlTake {
    pub fn count(n: i64) -> Self {
        Self {
            spec: DuqlTakeSpec::Count(n),
        }
    }

    pub fn range(range: impl Into<String>) -> Self {
        Self {
            spec: DuqlTakeSpec::Range(range.into()),
        }
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        Ok(Self {
            spec: int_or_string(value, path)?,
        })
    }
}

impl DuqlStepNode for DuqlTake {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn payload(&self) -> Value {
        self.spec.to_value()
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlTake::decode(value, path).map(DuqlStep::Take)
}
