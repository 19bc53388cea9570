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
use crate::expression::DuqlExpression;
use crate::node::DuqlNodePath;
use crate::steps::{DuqlStep, DuqlStepNode};

pub const TAG: &str = "filter";

/// Keeps rows matching a predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlFilter {
    pub predicate: DuqlExpression,
}

impl DuqlFilter {
    pub fn new(predicate: DuqlExpression) -> Self {
        Self { predicate }
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        Ok(Self::new(DuqlExpression::decode(value, path)?))
    }
}

impl DuqlStepNode for DuqlFilter {
    fn type_tag(&self) -> &'static str {
        TAG
    }

    fn validate(&self) -> Result<()> {
        self.predicate.validate()
    }

    fn payload(&self) -> Value {
        self.predicate.to_value()
    }
}

pub fn decode_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlFilter::decode(value, path).map(DuqlStep::Filter)
}
