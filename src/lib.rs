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

//! # DUQL Core Library
//!
//! DUQL is a declarative query language written as YAML. A document names
//! a source dataset, an optional table of reusable declarations, and an
//! ordered pipeline of steps:
//!
//! ```yaml
//! dataset: orders
//! steps:
//!   - filter: total > 100
//!   - group:
//!       by: region
//!       steps:
//!         - summarize: {revenue: sum total}
//!   - sort: -revenue
//!   - take: 5
//! ```
//!
//! This crate decodes such documents into a typed tree and validates its
//! structure. It does not execute queries or type-check expressions.
//!
//! ## Module Overview
//!
//! - **errors**: [`DuqlError`] and the crate-wide [`Result`]
//! - **node**: Node paths and shape-polymorphic readers over the YAML tree
//! - **expression**: Untyped expression values
//! - **dataset**: Source relation references
//! - **settings**: Document metadata and target dialects
//! - **steps**: The eleven pipeline step variants and their dispatch table
//! - **declare**: Named declarations (pipeline, expression, tuple, function)
//! - **query**: The document root
//! - **validator**: Single-document entry point and file/directory batches
//! - **compiler**: Interface for downstream query compilers
//! - **logging**: `log` backend used by the command-line front-end
//!
//! ## Feature Flags
//!
//! - `cli`: Builds the `duql` binary (default)
//! - `parallel`: Validates directory batches on a Rayon pool
//! - `full`: Enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use duql::{parse_and_validate, DuqlDataset};
//!
//! let query = parse_and_validate(b"dataset: orders\nsteps:\n  - take: 10\n").unwrap();
//! assert_eq!(query.dataset, DuqlDataset::simple("orders"));
//! assert_eq!(query.steps.len(), 1);
//! ```
//!
//! ## Error Handling
//!
//! Decoding and validation stop at the first violation. The returned
//! [`DuqlError`] carries the location of the offending node, and
//! [`DuqlError::kind`] classifies the violated rule.

pub mod errors;
pub mod node;
pub mod expression;
pub mod dataset;
pub mod settings;
pub mod steps;
pub mod declare;
pub mod query;
pub mod validator;
pub mod compiler;
pub mod logging;

pub use errors::{DuqlError, DuqlErrorKind, DuqlResultExt, Result};
pub use node::{DuqlColumns, DuqlNodePath, DuqlTakeSpec};
pub use expression::{DuqlExpression, DuqlNamedExpressions, DuqlScalar};
pub use dataset::{DuqlDataFormat, DuqlDataset};
pub use settings::{DuqlSettings, DuqlTargetDialect};
pub use steps::{
    DuqlFilter, DuqlGenerate, DuqlGroup, DuqlJoin, DuqlJoinType, DuqlLoop, DuqlSelect,
    DuqlSelectNot, DuqlSort, DuqlStep, DuqlStepNode, DuqlSteps, DuqlSummarize, DuqlTake,
    DuqlWindow,
};
pub use declare::{
    is_valid_identifier, DuqlDeclare, DuqlDeclareArm, DuqlDeclareValue, DuqlFunction,
    DuqlFunctionParam,
};
pub use query::DuqlQuery;
pub use validator::{
    parse_and_validate, DuqlFileOutcome, DuqlValidationReport, DuqlValidator,
    DuqlValidatorConfig,
};
pub use compiler::{DuqlCanonicalCompiler, DuqlCompiler, DuqlOutputFormat};
pub use logging::{DuqlLogConfig, DuqlLogger};
