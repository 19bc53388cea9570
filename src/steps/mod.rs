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

//! # Pipeline Steps
//!
//! A pipeline is an ordered sequence of steps. Each step is written as a
//! single-key mapping whose key names the step kind:
//!
//! ```yaml
//! steps:
//!   - filter: amount > 100
//!   - sort: [region, -amount]
//!   - take: 10
//! ```
//!
//! The key is resolved through a closed dispatch table ([`STEP_TABLE`]) to
//! the decoder of one of eleven variants. Every variant implements
//! [`DuqlStepNode`], which provides its tag, its structural validation and
//! its canonical encoding.
//!
//! | Tag | Variant |
//! |---|---|
//! | `filter` | [`DuqlFilter`] |
//! | `generate` | [`DuqlGenerate`] |
//! | `group` | [`DuqlGroup`] |
//! | `join` | [`DuqlJoin`] |
//! | `select` | [`DuqlSelect`] |
//! | `select!` | [`DuqlSelectNot`] |
//! | `sort` | [`DuqlSort`] |
//! | `take` | [`DuqlTake`] |
//! | `window` | [`DuqlWindow`] |
//! | `loop` | [`DuqlLoop`] |
//! | `summarize` | [`DuqlSummarize`] |

pub mod aggregate;
pub mod columns;
pub mod filter;
pub mod group;
pub mod join;
pub mod loops;
pub mod take;
pub mod window;

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::errors::{DuqlError, DuqlResultExt, Result};
use crate::node::{describe, expect_sequence, scalar_key, untag, DuqlNodePath};

pub use aggregate::{DuqlGenerate, DuqlSummarize};
pub use columns::{DuqlSelect, DuqlSelectNot, DuqlSort};
pub use filter::DuqlFilter;
pub use group::DuqlGroup;
pub use join::{DuqlJoin, DuqlJoinType};
pub use loops::DuqlLoop;
pub use take::DuqlTake;
pub use window::DuqlWindow;

/// Capabilities shared by every step variant.
pub trait DuqlStepNode: fmt::Debug {
    /// Key under which the step is written, e.g. `"select!"`.
    fn type_tag(&self) -> &'static str;

    /// Structural validation of the decoded payload.
    fn validate(&self) -> Result<()>;

    /// Canonical source form of the payload (without the tag key).
    fn payload(&self) -> Value;
}

/// One pipeline transformation stage.
#[derive(Clone, Debug, PartialEq)]
pub enum DuqlStep {
    Filter(DuqlFilter),
    Generate(DuqlGenerate),
    Group(DuqlGroup),
    Join(DuqlJoin),
    Select(DuqlSelect),
    SelectNot(DuqlSelectNot),
    Sort(DuqlSort),
    Take(DuqlTake),
    Window(DuqlWindow),
    Loop(DuqlLoop),
    Summarize(DuqlSummarize),
}

/// Ordered step sequence; order is execution order.
pub type DuqlSteps = Vec<DuqlStep>;

impl DuqlStep {
    pub fn as_node(&self) -> &dyn DuqlStepNode {
        match self {
            DuqlStep::Filter(step) => step,
            DuqlStep::Generate(step) => step,
            DuqlStep::Group(step) => step,
            DuqlStep::Join(step) => step,
            DuqlStep::Select(step) => step,
            DuqlStep::SelectNot(step) => step,
            DuqlStep::Sort(step) => step,
            DuqlStep::Take(step) => step,
            DuqlStep::Window(step) => step,
            DuqlStep::Loop(step) => step,
            DuqlStep::Summarize(step) => step,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        self.as_node().type_tag()
    }

    pub fn validate(&self) -> Result<()> {
        self.as_node().validate()
    }

    /// Canonical single-key mapping `{tag: payload}`.
    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        map.insert(Value::String(self.type_tag().to_string()), self.as_node().payload());
        Value::Mapping(map)
    }

    /// Decodes one `{tag: payload}` step object.
    pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
        let map = match untag(value) {
            Value::Mapping(map) => map,
            other => {
                return Err(DuqlError::shape(
                    path,
                    "single-key mapping",
                    describe(other),
                ))
            }
        };

        let mut entries = map.iter();
        let (key, payload) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(DuqlError::shape(
                    path,
                    "single-key mapping",
                    format!("mapping with {} keys", map.len()),
                ))
            }
        };

        let tag = scalar_key(key, path)?;
        let entry = lookup(&tag).ok_or_else(|| DuqlError::unknown_step(path, tag.as_str()))?;
        (entry.decode)(payload, &path.key(entry.tag)).map_err(|err| err.into_malformed(entry.tag))
    }
}

/// Decoder signature stored in the dispatch table.
pub type DuqlStepDecoder = fn(&Value, &DuqlNodePath) -> Result<DuqlStep>;

/// One row of the dispatch table.
#[derive(Clone, Copy)]
pub struct DuqlStepEntry {
    pub tag: &'static str,
    pub decode: DuqlStepDecoder,
}

impl fmt::Debug for DuqlStepEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuqlStepEntry").field("tag", &self.tag).finish()
    }
}

/// Closed mapping from step tag to decoder.
///
/// Rows carry only the decoder. The validator half of each pair is the
/// [`DuqlStepNode::validate`] impl of the variant the decoder returns, reached
/// through [`DuqlStep::validate`], so a row cannot pair a decoder with the
/// wrong validator.
pub static STEP_TABLE: [DuqlStepEntry; 11] = [
    DuqlStepEntry { tag: filter::TAG, decode: filter::decode_step },
    DuqlStepEntry { tag: join::TAG, decode: join::decode_step },
    DuqlStepEntry { tag: group::TAG, decode: group::decode_step },
    DuqlStepEntry { tag: aggregate::GENERATE_TAG, decode: aggregate::decode_generate_step },
    DuqlStepEntry { tag: columns::SORT_TAG, decode: columns::decode_sort_step },
    DuqlStepEntry { tag: take::TAG, decode: take::decode_step },
    DuqlStepEntry { tag: window::TAG, decode: window::decode_step },
    DuqlStepEntry { tag: columns::SELECT_TAG, decode: columns::decode_select_step },
    DuqlStepEntry { tag: columns::SELECT_NOT_TAG, decode: columns::decode_select_not_step },
    DuqlStepEntry { tag: loops::TAG, decode: loops::decode_step },
    DuqlStepEntry { tag: aggregate::SUMMARIZE_TAG, decode: aggregate::decode_summarize_step },
];

/// Finds the table row for `tag`.
pub fn lookup(tag: &str) -> Option<&'static DuqlStepEntry> {
    STEP_TABLE.iter().find(|entry| entry.tag == tag)
}

/// Every recognised step tag, in table order.
pub fn step_tags() -> impl Iterator<Item = &'static str> {
    STEP_TABLE.iter().map(|entry| entry.tag)
}

/// Decodes a step sequence; null is an empty pipeline.
pub fn decode_steps(value: &Value, path: &DuqlNodePath) -> Result<DuqlSteps> {
    let items = expect_sequence(value, path)?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| DuqlStep::decode(item, &path.index(idx)))
        .collect()
}

/// Validates steps in order, stopping at the first failure. Errors are
/// wrapped with the step index and tag, prefixed by `parent` for nested
/// sequences.
pub fn validate_steps(steps: &[DuqlStep], parent: Option<&str>) -> Result<()> {
    for (idx, step) in steps.iter().enumerate() {
        step.validate().with_context(|| match parent {
            Some(parent) => format!("{} step {} '{}'", parent, idx, step.type_tag()),
            None => format!("step {} '{}'", idx, step.type_tag()),
        })?;
    }
    Ok(())
}

pub fn encode_steps(steps: &[DuqlStep]) -> Value {
    Value::Sequence(steps.iter().map(DuqlStep::to_value).collect())
}
