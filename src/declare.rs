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

//! # Declarations
//!
//! The `declare` section binds reusable names to values:
//!
//! ```yaml
//! declare:
//!   recent_orders:                  # pipeline
//!     - filter: created_at > @2024-01-01
//!   threshold: 100                  # expression
//!   region_codes: {north: 1, south: 2}   # tuple
//!   discounted:                     # function
//!     function:
//!       parameters: [price, {name: rate, default: 0.1}]
//!       expression: price * (1 - rate)
//! ```
//!
//! The surface syntax is untagged, so a value is decoded by probing its
//! arms in a fixed precedence order (pipeline, expression, tuple, function).
//! A mapping keyed by arm names (`pipeline`, `expression`, `tuple`,
//! `function`) is a tagged block and populates every arm it names;
//! validation then requires exactly one populated arm. A block carrying
//! `parameters` next to `expression` populates both the function and the
//! expression arm, and is therefore ambiguous.

use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, DuqlResultExt, Result};
use crate::expression::DuqlExpression;
use crate::node::{
    describe, expect_mapping, expect_sequence, expect_string, field, mapping_key, scalar_key,
    untag, warn_unknown_keys, DuqlNodePath,
};
use crate::steps::{decode_steps, encode_steps, validate_steps, DuqlStep, DuqlSteps};

const PIPELINE_KEY: &str = "pipeline";
const EXPRESSION_KEY: &str = "expression";
const TUPLE_KEY: &str = "tuple";
const FUNCTION_KEY: &str = "function";
const PARAMETERS_KEY: &str = "parameters";

/// Arm keys of a tagged block, in precedence order.
pub const ARM_KEYS: [&str; 4] = [PIPELINE_KEY, EXPRESSION_KEY, TUPLE_KEY, FUNCTION_KEY];

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

/// Whether `name` matches `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"))
        .is_match(name)
}

/// One function parameter with an optional default value.
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlFunctionParam {
    pub name: String,
    pub default: Option<Value>,
}

impl DuqlFunctionParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        match untag(value) {
            Value::String(name) => Ok(Self::new(name.clone())),
            Value::Mapping(map) => {
                warn_unknown_keys(map, &["name", "default"], path);
                let name = match map.get("name") {
                    Some(v) => expect_string(v, &path.key("name"))?,
                    None => return Err(DuqlError::missing(path.key("name").to_string())),
                };
                Ok(Self {
                    name,
                    default: field(map, "default").cloned(),
                })
            }
            other => Err(DuqlError::shape(
                path,
                "parameter name or {name, default} mapping",
                describe(other),
            )),
        }
    }

    fn to_value(&self) -> Value {
        match &self.default {
            None => Value::String(self.name.clone()),
            Some(default) => {
                let mut map = Mapping::new();
                map.insert("name".into(), Value::String(self.name.clone()));
                map.insert("default".into(), default.clone());
                Value::Mapping(map)
            }
        }
    }
}

/// A parameterised expression.
#[derive(Clone, Debug, PartialEq)]
pub struct DuqlFunction {
    pub parameters: Vec<DuqlFunctionParam>,
    pub body: DuqlExpression,
}

impl DuqlFunction {
    pub fn new(parameters: Vec<DuqlFunctionParam>, body: DuqlExpression) -> Self {
        Self { parameters, body }
    }

    fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = expect_mapping(value, path)?;
        warn_unknown_keys(map, &[PARAMETERS_KEY, EXPRESSION_KEY], path);
        Self::decode_inline(map, path)
    }

    /// Function spelled directly on a declaration block. The block's
    /// `expression` key doubles as the body.
    fn decode_inline(map: &Mapping, path: &DuqlNodePath) -> Result<Self> {
        let parameters = Self::decode_parameters(map, path)?;
        let body_path = path.key(EXPRESSION_KEY);
        let body = match map.get(EXPRESSION_KEY) {
            Some(v) => DuqlExpression::decode(v, &body_path)?,
            None => return Err(DuqlError::missing(body_path.to_string())),
        };
        Ok(Self { parameters, body })
    }

    fn decode_parameters(map: &Mapping, path: &DuqlNodePath) -> Result<Vec<DuqlFunctionParam>> {
        let params_path = path.key(PARAMETERS_KEY);
        match map.get(PARAMETERS_KEY) {
            Some(v) => expect_sequence(v, &params_path)?
                .iter()
                .enumerate()
                .map(|(idx, item)| DuqlFunctionParam::decode(item, &params_path.index(idx)))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parameters.is_empty() {
            return Err(DuqlError::EmptyFunctionParameters);
        }
        for (idx, param) in self.parameters.iter().enumerate() {
            if !is_valid_identifier(&param.name) {
                return Err(DuqlError::invalid_identifier(param.name.as_str()))
                    .context(format!("parameter {}", idx));
            }
        }
        self.body.validate().context("function body")
    }

    fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        map.insert(
            PARAMETERS_KEY.into(),
            Value::Sequence(self.parameters.iter().map(DuqlFunctionParam::to_value).collect()),
        );
        map.insert(EXPRESSION_KEY.into(), self.body.to_value());
        Value::Mapping(map)
    }
}

/// Borrowed view of the single populated arm of a [`DuqlDeclareValue`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DuqlDeclareArm<'a> {
    Pipeline(&'a [DuqlStep]),
    Expression(&'a DuqlExpression),
    Tuple(&'a Mapping),
    Function(&'a DuqlFunction),
}

/// Value bound to a declared name. Exactly one arm must be populated for
/// the value to validate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlDeclareValue {
    pub pipeline: Option<DuqlSteps>,
    pub expression: Option<DuqlExpression>,
    pub tuple: Option<Mapping>,
    pub function: Option<DuqlFunction>,
}

impl DuqlDeclareValue {
    pub fn pipeline(steps: DuqlSteps) -> Self {
        Self {
            pipeline: Some(steps),
            ..Self::default()
        }
    }

    pub fn expression(expr: DuqlExpression) -> Self {
        Self {
            expression: Some(expr),
            ..Self::default()
        }
    }

    pub fn tuple(fields: Mapping) -> Self {
        Self {
            tuple: Some(fields),
            ..Self::default()
        }
    }

    pub fn function(function: DuqlFunction) -> Self {
        Self {
            function: Some(function),
            ..Self::default()
        }
    }

    /// Number of populated arms.
    pub fn populated(&self) -> usize {
        [
            self.pipeline.is_some(),
            self.expression.is_some(),
            self.tuple.is_some(),
            self.function.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// The populated arm, when there is exactly one.
    pub fn arm(&self) -> Option<DuqlDeclareArm<'_>> {
        if self.populated() != 1 {
            return None;
        }
        if let Some(steps) = &self.pipeline {
            return Some(DuqlDeclareArm::Pipeline(steps));
        }
        if let Some(expr) = &self.expression {
            return Some(DuqlDeclareArm::Expression(expr));
        }
        if let Some(fields) = &self.tuple {
            return Some(DuqlDeclareArm::Tuple(fields));
        }
        self.function.as_ref().map(DuqlDeclareArm::Function)
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        match untag(value) {
            Value::Null => Err(DuqlError::shape(
                path,
                "pipeline, expression, tuple or function",
                "null",
            )),
            Value::Mapping(map) if is_tagged_block(map) => Self::decode_block(map, path),
            other => Self::decode_untagged(other, path),
        }
    }

    fn decode_block(map: &Mapping, path: &DuqlNodePath) -> Result<Self> {
        for key in map.keys() {
            let name = mapping_key(key, path)?;
            if !ARM_KEYS.contains(&name.as_str()) && name != PARAMETERS_KEY {
                return Err(DuqlError::shape(
                    path.key(&name),
                    "one of pipeline, expression, tuple, function",
                    format!("'{}'", name),
                ));
            }
        }

        let pipeline = map
            .get(PIPELINE_KEY)
            .map(|v| decode_steps(v, &path.key(PIPELINE_KEY)))
            .transpose()?;
        let expression = map
            .get(EXPRESSION_KEY)
            .map(|v| DuqlExpression::decode(v, &path.key(EXPRESSION_KEY)))
            .transpose()?;
        let tuple = map
            .get(TUPLE_KEY)
            .map(|v| decode_tuple(v, &path.key(TUPLE_KEY)))
            .transpose()?;
        // a bare `parameters` key reads the block itself as a function
        let function = match (map.get(FUNCTION_KEY), map.contains_key(PARAMETERS_KEY)) {
            (Some(v), _) => Some(DuqlFunction::decode(v, &path.key(FUNCTION_KEY))?),
            (None, true) => Some(DuqlFunction::decode_inline(map, path)?),
            (None, false) => None,
        };

        Ok(Self {
            pipeline,
            expression,
            tuple,
            function,
        })
    }

    fn decode_untagged(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        if let Some(steps) = try_pipeline(value, path) {
            return Ok(Self::pipeline(steps));
        }
        match value {
            Value::Mapping(_) => Ok(Self::tuple(decode_tuple(value, path)?)),
            _ => Ok(Self::expression(DuqlExpression::decode(value, path)?)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let populated = self.populated();
        if populated != 1 {
            return Err(DuqlError::AmbiguousDeclareValue { populated });
        }
        match self.arm() {
            Some(DuqlDeclareArm::Pipeline(steps)) => validate_steps(steps, Some(PIPELINE_KEY)),
            Some(DuqlDeclareArm::Expression(expr)) => expr.validate(),
            Some(DuqlDeclareArm::Function(function)) => function.validate(),
            Some(DuqlDeclareArm::Tuple(_)) | None => Ok(()),
        }
    }

    /// Canonical tagged block naming every populated arm.
    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        if let Some(steps) = &self.pipeline {
            map.insert(PIPELINE_KEY.into(), encode_steps(steps));
        }
        if let Some(expr) = &self.expression {
            map.insert(EXPRESSION_KEY.into(), expr.to_value());
        }
        if let Some(fields) = &self.tuple {
            map.insert(TUPLE_KEY.into(), Value::Mapping(fields.clone()));
        }
        if let Some(function) = &self.function {
            map.insert(FUNCTION_KEY.into(), function.to_value());
        }
        Value::Mapping(map)
    }
}

fn is_tagged_block(map: &Mapping) -> bool {
    map.keys()
        .filter_map(Value::as_str)
        .any(|key| ARM_KEYS.contains(&key) || key == PARAMETERS_KEY)
}

/// A non-empty sequence whose every element decodes as a step.
fn try_pipeline(value: &Value, path: &DuqlNodePath) -> Option<DuqlSteps> {
    match value {
        Value::Sequence(items) if !items.is_empty() => decode_steps(value, path).ok(),
        _ => None,
    }
}

fn decode_tuple(value: &Value, path: &DuqlNodePath) -> Result<Mapping> {
    let map = expect_mapping(value, path)?;
    for key in map.keys() {
        mapping_key(key, path)?;
    }
    Ok(map.clone())
}

/// Ordered table of named declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuqlDeclare {
    entries: Vec<(String, DuqlDeclareValue)>,
}

impl DuqlDeclare {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing an earlier binding in place.
    pub fn insert(&mut self, name: impl Into<String>, value: DuqlDeclareValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: DuqlDeclareValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DuqlDeclareValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DuqlDeclareValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes the `declare` mapping; null is an empty table.
    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        if matches!(untag(value), Value::Null) {
            return Ok(Self::new());
        }
        let map = expect_mapping(value, path)?;
        let mut table = Self::new();
        for (key, item) in map {
            let name = scalar_key(key, path)?;
            if !is_valid_identifier(&name) {
                return Err(DuqlError::invalid_identifier(name));
            }
            let value = DuqlDeclareValue::decode(item, &path.key(&name))?;
            table.entries.push((name, value));
        }
        Ok(table)
    }

    /// Validates entries in order. Names are re-checked because a table may
    /// be built without going through [`DuqlDeclare::decode`].
    pub fn validate(&self) -> Result<()> {
        for (name, value) in &self.entries {
            if !is_valid_identifier(name) {
                return Err(DuqlError::invalid_identifier(name.as_str()))
                    .context(format!("declare '{}'", name));
            }
            value.validate().with_context(|| format!("declare '{}'", name))?;
        }
        Ok(())
    }

    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        for (name, value) in &self.entries {
            map.insert(Value::String(name.clone()), value.to_value());
        }
        Value::Mapping(map)
    }
}
