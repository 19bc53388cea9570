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

//! Steps whose payload is a non-empty `name -> expression` mapping:
//! `generate` derives new columns, `summarize` aggregates.

use serde_yaml::Value;

use crate::errors::{DuqlError, DuqlResultExt, Result};
use crate::expression::{
    decode_named_expressions, encode_named_expressions, DuqlExpression, DuqlNamedExpressions,
};
use crate::node::DuqlNodePath;
use crate::steps::{DuqlStep, DuqlStepNode};

pub const GENERATE_TAG: &str = "generate";
pub const SUMMARIZE_TAG: &str = "summarize";

fn validate_entries(tag: &str, entries: &DuqlNamedExpressions) -> Result<()> {
    if entries.is_empty() {
        return Err(DuqlError::empty_body(tag));
    }
    for (name, expr) in entries {
        expr.validate().with_context(|| format!("'{}'", name))?;
    }
    Ok(())
}

/// Adds computed columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlGenerate {
    pub columns: DuqlNamedExpressions,
}

impl DuqlGenerate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, expr: DuqlExpression) -> Self {
        self.columns.push((name.into(), expr));
        self
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        Ok(Self {
            columns: decode_named_expressions(value, path)?,
        })
    }
}

impl DuqlStepNode for DuqlGenerate {
    fn type_tag(&self) -> &'static str {
        GENERATE_TAG
    }

    fn validate(&self) -> Result<()> {
        validate_entries(GENERATE_TAG, &self.columns)
    }

    fn payload(&self) -> Value {
        encode_named_expressions(&self.columns)
    }
}

/// Reduces rows to aggregate values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlSummarize {
    pub aggregations: DuqlNamedExpressions,
}

impl DuqlSummarize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, expr: DuqlExpression) -> Self {
        self.aggregations.push((name.into(), expr));
        self
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        Ok(Self {
            aggregations: decode_named_expressions(value, path)?,
        })
    }
}

impl DuqlStepNode for DuqlSummarize {
    fn type_tag(&self) -> &'static str {
        SUMMARIZE_TAG
    }

    fn validate(&self) -> Result<()> {
        validate_entries(SUMMARIZE_TAG, &self.aggregations)
    }

    fn payload(&self) -> Value {
        encode_named_expressions(&self.aggregations)
    }
}

pub fn decode_generate_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlGenerate::decode(value, path).map(DuqlStep::Generate)
}

pub fn decode_summarize_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlSummarize::decode(value, path).map(DuqlStep::Summarize)
}
