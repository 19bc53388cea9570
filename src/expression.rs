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

//! Untyped value carrier used by filters, aggregations and declarations.
//!
//! Expression contents are not interpreted here; only the shape is checked.

use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, Result};
use crate::node::{describe, expect_mapping, mapping_key, value_shape, DuqlNodePath, DuqlShape};

/// A primitive scalar as written in the document.
#[derive(Clone, Debug, PartialEq)]
pub enum DuqlScalar {
    String(String),
    Integer(i64),
    /// Integer above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl DuqlScalar {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(DuqlScalar::String(s.clone())),
            Value::Bool(b) => Some(DuqlScalar::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(DuqlScalar::Integer)
                .or_else(|| n.as_u64().map(DuqlScalar::Unsigned))
                .or_else(|| n.as_f64().map(DuqlScalar::Float)),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DuqlScalar::String(s) => Value::String(s.clone()),
            DuqlScalar::Integer(i) => Value::Number((*i).into()),
            DuqlScalar::Unsigned(u) => Value::Number((*u).into()),
            DuqlScalar::Float(f) => Value::Number((*f).into()),
            DuqlScalar::Bool(b) => Value::Bool(*b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DuqlScalar::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Scalar, ordered mapping, or ordered sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum DuqlExpression {
    Scalar(DuqlScalar),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl DuqlExpression {
    /// Convenience constructor for the common string form.
    pub fn text(expr: impl Into<String>) -> Self {
        DuqlExpression::Scalar(DuqlScalar::String(expr.into()))
    }

    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        match value_shape(value, path)? {
            DuqlShape::Scalar(v) => match DuqlScalar::from_value(v) {
                Some(scalar) => Ok(DuqlExpression::Scalar(scalar)),
                None => Err(DuqlError::shape(path, "scalar", describe(v))),
            },
            DuqlShape::Mapping(map) => {
                for key in map.keys() {
                    mapping_key(key, path)?;
                }
                Ok(DuqlExpression::Mapping(map.clone()))
            }
            DuqlShape::Sequence(items) => Ok(DuqlExpression::Sequence(items.to_vec())),
        }
    }

    /// Shape-only check. Any arm that survived decoding is valid.
    pub fn validate(&self) -> Result<()> {
        match self {
            DuqlExpression::Scalar(_) | DuqlExpression::Mapping(_) | DuqlExpression::Sequence(_) => {
                Ok(())
            }
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DuqlExpression::Scalar(scalar) => scalar.to_value(),
            DuqlExpression::Mapping(map) => Value::Mapping(map.clone()),
            DuqlExpression::Sequence(items) => Value::Sequence(items.clone()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DuqlExpression::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }
}

/// Ordered `name -> expression` entries of a generate or summarize step.
pub type DuqlNamedExpressions = Vec<(String, DuqlExpression)>;

/// Decodes a mapping of names to expressions, keeping source order.
pub fn decode_named_expressions(
    value: &Value,
    path: &DuqlNodePath,
) -> Result<DuqlNamedExpressions> {
    let map = expect_mapping(value, path)?;
    let mut entries = Vec::with_capacity(map.len());
    for (key, item) in map {
        let name = mapping_key(key, path)?;
        let expr = DuqlExpression::decode(item, &path.key(&name))?;
        entries.push((name, expr));
    }
    Ok(entries)
}

pub fn encode_named_expressions(entries: &DuqlNamedExpressions) -> Value {
    let mut map = Mapping::new();
    for (name, expr) in entries {
        map.insert(Value::String(name.clone()), expr.to_value());
    }
    Value::Mapping(map)
}
