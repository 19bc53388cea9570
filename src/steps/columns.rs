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

//! Column-list steps. `select` keeps columns, `select!` drops them and
//! `sort` orders by them; each takes one name or a list of names.

use serde_yaml::Value;

use crate::errors::Result;
use crate::node::{string_or_list, DuqlColumns, DuqlNodePath};
use crate::steps::{DuqlStep, DuqlStepNode};

pub const SELECT_TAG: &str = "select";
pub const SELECT_NOT_TAG: &str = "select!";
pub const SORT_TAG: &str = "sort";

macro_rules! column_step {
    ($(#[$doc:meta])* $name:ident, $tag:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            pub columns: DuqlColumns,
        }

        impl $name {
            pub fn new(columns: DuqlColumns) -> Self {
                Self { columns }
            }

            pub fn decode(value: &Value, path: &DuqlNodePath) -> Result<Self> {
                Ok(Self::new(string_or_list(value, path)?))
            }
        }

        impl DuqlStepNode for $name {
            fn type_tag(&self) -> &'static str {
                $tag
            }

            // the string-or-list decode is the only constraint
            fn validate(&self) -> Result<()> {
                Ok(())
            }

            fn payload(&self) -> Value {
                self.columns.to_value()
            }
        }
    };
}

column_step!(
    /// Projects the listed columns.
    DuqlSelect,
    SELECT_TAG
);
column_step!(
    /// Projects every column except the listed ones.
    DuqlSelectNot,
    SELECT_NOT_TAG
);
column_step!(
    /// Orders rows by the listed columns.
    DuqlSort,
    SORT_TAG
);

pub fn decode_select_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlSelect::decode(value, path).map(DuqlStep::Select)
}

pub fn decode_select_not_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlSelectNot::decode(value, path).map(DuqlStep::SelectNot)
}

pub fn decode_sort_step(value: &Value, path: &DuqlNodePath) -> Result<DuqlStep> {
    DuqlSort::decode(value, path).map(DuqlStep::Sort)
}
