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

use crate::errors::{DuqlError, Result};
use crate::node::DuqlNodePath;
use crate::steps::{decode_steps, encode_steps, validate_steps, DuqlStep, DuqlStepNode, DuqlSteps};

pub const TAG: &str = "loop";

/// Repeats a nested pipeline; must contain at least one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlLoop {
    pub steps: DuqlSteps,
}

impl DuqlLoop {
    pub fn new(steps: DuqlSteps) -> Self {
        Self { steps }
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        Ok(Self::new(decode_steps(value, path)?))
    }
}

impl DuqlStepNode for DuqlLoop {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(DuqlError::EmptyLoopBody);
        }
        validate_steps(&self.steps, Some(TAG))
    }

    fn payload(&self) -> Value {
        encode_steps(&self.steps)
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlLoop::decode(value, path).map(DuqlStep::Loop)
}
