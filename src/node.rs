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

//! # Shape Decoders
//!
//! DUQL documents are first read into a generic `serde_yaml::Value` tree and
//! then decoded by hand. Several positions accept more than one surface
//! syntax for the same concept, so the readers in this module dispatch on the
//! runtime shape of a node:
//!
//! - [`string_or_list`]: a column name or a list of column names
//! - [`int_or_string`]: a row count or a range expression
//! - [`value_shape`]: any scalar, mapping or sequence (never null)
//!
//! Every reader takes the [`DuqlNodePath`] of the node so failures name the
//! offending field.

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, Result};

/// Dotted location of a node inside the document, e.g. `steps[2].join.where`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuqlNodePath {
    rendered: String,
}

impl DuqlNodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child stored under `key`.
    pub fn key(&self, key: &str) -> Self {
        let rendered = if self.rendered.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.rendered, key)
        };
        Self { rendered }
    }

    /// Path of the sequence element at `index`.
    pub fn index(&self, index: usize) -> Self {
        Self {
            rendered: format!("{}[{}]", self.rendered, index),
        }
    }

    pub fn is_root(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for DuqlNodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rendered.is_empty() {
            f.write_str("<document>")
        } else {
            f.write_str(&self.rendered)
        }
    }
}

/// Human-readable name of a node's shape for diagnostics.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Strips YAML tags so `!tag value` decodes like `value`.
pub fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// A single column name or an ordered list of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuqlColumns {
    Single(String),
    Many(Vec<String>),
}

impl DuqlColumns {
    /// Column names in source order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            DuqlColumns::Single(name) => vec![name.as_str()],
            DuqlColumns::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DuqlColumns::Single(name) => Value::String(name.clone()),
            DuqlColumns::Many(names) => {
                Value::Sequence(names.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Reads a string scalar or a sequence of string scalars.
pub fn string_or_list(value: &Value, path: &DuqlNodePath) -> Result<DuqlColumns> {
    match untag(value) {
        Value::String(s) => Ok(DuqlColumns::Single(s.clone())),
        Value::Sequence(items) => {
            let mut names = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match untag(item) {
                    Value::String(s) => names.push(s.clone()),
                    other => {
                        return Err(DuqlError::shape(path.index(idx), "string", describe(other)))
                    }
                }
            }
            Ok(DuqlColumns::Many(names))
        }
        other => Err(DuqlError::shape(
            path,
            "string or sequence of strings",
            describe(other),
        )),
    }
}

/// A take count or a take range expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuqlTakeSpec {
    Count(i64),
    Range(String),
}

impl DuqlTakeSpec {
    pub fn to_value(&self) -> Value {
        match self {
            DuqlTakeSpec::Count(n) => Value::Number((*n).into()),
            DuqlTakeSpec::Range(range) => Value::String(range.clone()),
        }
    }
}

/// Reads an integer scalar or a string scalar, nothing else.
pub fn int_or_string(value: &Value, path: &DuqlNodePath) -> Result<DuqlTakeSpec> {
    match untag(value) {
        Value::Number(n) if n.is_f64() => {
            Err(DuqlError::shape(path, "integer or string", "float"))
        }
        Value::Number(n) => n
            .as_i64()
            .map(DuqlTakeSpec::Count)
            .ok_or_else(|| DuqlError::shape(path, "integer or string", "integer out of range")),
        Value::String(s) => Ok(DuqlTakeSpec::Range(s.clone())),
        other => Err(DuqlError::shape(path, "integer or string", describe(other))),
    }
}

/// Resolved shape of a node accepted by [`value_shape`].
#[derive(Clone, Debug, PartialEq)]
pub enum DuqlShape<'a> {
    Scalar(&'a Value),
    Mapping(&'a Mapping),
    Sequence(&'a [Value]),
}

/// Classifies a node as scalar, mapping or sequence; null is rejected.
pub fn value_shape<'a>(value: &'a Value, path: &DuqlNodePath) -> Result<DuqlShape<'a>> {
    match untag(value) {
        Value::Null => Err(DuqlError::shape(
            path,
            "scalar, mapping or sequence",
            "null",
        )),
        v @ (Value::Bool(_) | Value::Number(_) | Value::String(_)) => Ok(DuqlShape::Scalar(v)),
        Value::Mapping(map) => Ok(DuqlShape::Mapping(map)),
        Value::Sequence(items) => Ok(DuqlShape::Sequence(items)),
        // untag never returns a tagged node
        Value::Tagged(_) => Err(DuqlError::shape(
            path,
            "scalar, mapping or sequence",
            "tagged value",
        )),
    }
}

/// Requires a mapping node.
pub fn expect_mapping<'a>(value: &'a Value, path: &DuqlNodePath) -> Result<&'a Mapping> {
    match untag(value) {
        Value::Mapping(map) => Ok(map),
        other => Err(DuqlError::shape(path, "mapping", describe(other))),
    }
}

/// Requires a sequence node; null counts as an empty sequence.
pub fn expect_sequence<'a>(value: &'a Value, path: &DuqlNodePath) -> Result<&'a [Value]> {
    match untag(value) {
        Value::Sequence(items) => Ok(items),
        Value::Null => Ok(&[]),
        other => Err(DuqlError::shape(path, "sequence", describe(other))),
    }
}

/// Requires a string scalar.
pub fn expect_string(value: &Value, path: &DuqlNodePath) -> Result<String> {
    match untag(value) {
        Value::String(s) => Ok(s.clone()),
        other => Err(DuqlError::shape(path, "string", describe(other))),
    }
}

/// Reads a mapping key, which must be a string.
pub fn mapping_key(key: &Value, path: &DuqlNodePath) -> Result<String> {
    match untag(key) {
        Value::String(s) => Ok(s.clone()),
        other => Err(DuqlError::shape(path, "string key", describe(other))),
    }
}

/// Reads a mapping key as text. Bool, number and null keys are rendered the
/// way YAML prints them; mapping and sequence keys are rejected.
pub fn scalar_key(key: &Value, path: &DuqlNodePath) -> Result<String> {
    match untag(key) {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(DuqlError::shape(path, "scalar key", describe(other))),
    }
}

/// Looks up `key` in a mapping, treating an explicit null like an absent key.
pub fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !matches!(untag(v), Value::Null))
}

/// Logs and skips keys a structured node does not recognise.
pub fn warn_unknown_keys(map: &Mapping, known: &[&str], path: &DuqlNodePath) {
    for key in map.keys() {
        let recognised = key.as_str().map(|k| known.contains(&k)).unwrap_or(false);
        if !recognised {
            log::warn!(
                "ignoring unknown key {} at '{}'",
                serde_yaml::to_string(key)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| "<unprintable>".to_string()),
                path
            );
        }
    }
}
