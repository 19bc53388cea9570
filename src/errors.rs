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

//! # DUQL Error Module
//!
//! This module defines the error types used throughout DUQL for consistent
//! decode and validation reporting.
//!
//! ## Error Handling Philosophy
//!
//! - **Explicit Error Types**: Each variant names one violated invariant
//!   (wrong node shape, unknown step tag, bad identifier, ...)
//! - **Context-Rich**: Decode errors carry the offending field path;
//!   validation errors are wrapped with [`DuqlError::Context`] layers as they
//!   propagate, so the final message names the exact location
//! - **Fail-Fast**: The first error aborts the walk; nothing is accumulated
//! - **Serde Support**: Errors can be serialized for JSON reports
//!
//! ## Usage
//!
//! ```rust
//! use duql::errors::{DuqlError, DuqlErrorKind, Result};
//!
//! fn check(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(DuqlError::missing("dataset"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check("").map_err(|e| e.context("query")).unwrap_err();
//! assert_eq!(err.kind(), DuqlErrorKind::MissingRequiredField);
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout DUQL.
pub type Result<T> = std::result::Result<T, DuqlError>;

/// Canonical error enumeration for DUQL.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DuqlError {
    /// A node's shape is not one of the shapes accepted at its position.
    #[error("shape mismatch at '{path}': expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A step object is keyed by a tag outside the closed step table.
    #[error("unknown step type '{tag}' at '{path}'")]
    UnknownStepType { path: String, tag: String },

    /// A recognised step whose value does not fit the variant's payload.
    #[error("malformed '{tag}' step at '{path}': {message}")]
    MalformedStepBody {
        path: String,
        tag: String,
        message: String,
    },

    /// A declaration (or function parameter) name that is not an identifier.
    #[error("invalid identifier '{name}'")]
    InvalidIdentifier { name: String },

    /// A declaration value populating zero or several of its arms.
    #[error(
        "declaration must be exactly one of pipeline, expression, tuple or function, found {populated}"
    )]
    AmbiguousDeclareValue { populated: usize },

    /// A function declaration without parameters.
    #[error("function must declare at least one parameter")]
    EmptyFunctionParameters,

    /// A generate or summarize step with no entries.
    #[error("'{tag}' must contain at least one entry")]
    EmptyStepBody { tag: String },

    /// A loop step with no nested steps.
    #[error("loop must contain at least one step")]
    EmptyLoopBody,

    /// A required field that is absent or empty.
    #[error("missing required field '{field}'")]
    MissingRequiredField { field: String },

    /// The raw text is not a well-formed document in the host syntax.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Errors originating from filesystem access.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for output serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// One location segment wrapped around an inner error.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DuqlError>,
    },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Flat classification of a [`DuqlError`], ignoring context layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuqlErrorKind {
    ShapeMismatch,
    UnknownStepType,
    MalformedStepBody,
    InvalidIdentifier,
    AmbiguousDeclareValue,
    EmptyFunctionParameters,
    EmptyStepBody,
    EmptyLoopBody,
    MissingRequiredField,
    Syntax,
    Io,
    Serde,
    Internal,
}

impl DuqlErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuqlErrorKind::ShapeMismatch => "ShapeMismatch",
            DuqlErrorKind::UnknownStepType => "UnknownStepType",
            DuqlErrorKind::MalformedStepBody => "MalformedStepBody",
            DuqlErrorKind::InvalidIdentifier => "InvalidIdentifier",
            DuqlErrorKind::AmbiguousDeclareValue => "AmbiguousDeclareValue",
            DuqlErrorKind::EmptyFunctionParameters => "EmptyFunctionParameters",
            DuqlErrorKind::EmptyStepBody => "EmptyStepBody",
            DuqlErrorKind::EmptyLoopBody => "EmptyLoopBody",
            DuqlErrorKind::MissingRequiredField => "MissingRequiredField",
            DuqlErrorKind::Syntax => "Syntax",
            DuqlErrorKind::Io => "Io",
            DuqlErrorKind::Serde => "Serde",
            DuqlErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for DuqlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<io::Error> for DuqlError {
    fn from(err: io::Error) -> Self {
        DuqlError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for DuqlError {
    fn from(err: serde_yaml::Error) -> Self {
        DuqlError::Syntax(err.to_string())
    }
}

impl From<serde_json::Error> for DuqlError {
    fn from(err: serde_json::Error) -> Self {
        DuqlError::Serde(err.to_string())
    }
}

impl DuqlError {
    /// Helper to construct shape mismatch errors.
    pub fn shape(
        path: impl fmt::Display,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        DuqlError::ShapeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Helper to construct unknown step type errors.
    pub fn unknown_step(path: impl fmt::Display, tag: impl Into<String>) -> Self {
        DuqlError::UnknownStepType {
            path: path.to_string(),
            tag: tag.into(),
        }
    }

    /// Helper to construct malformed step body errors.
    pub fn malformed(
        path: impl fmt::Display,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DuqlError::MalformedStepBody {
            path: path.to_string(),
            tag: tag.into(),
            message: message.into(),
        }
    }

    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        DuqlError::InvalidIdentifier { name: name.into() }
    }

    pub fn empty_body(tag: impl Into<String>) -> Self {
        DuqlError::EmptyStepBody { tag: tag.into() }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        DuqlError::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        DuqlError::Internal(message.into())
    }

    /// Wraps `self` with one location segment.
    pub fn context(self, context: impl Into<String>) -> Self {
        DuqlError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error beneath every context layer.
    pub fn root_cause(&self) -> &DuqlError {
        let mut current = self;
        while let DuqlError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Context segments from the outermost to the innermost.
    pub fn context_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        while let DuqlError::Context { context, source } = current {
            chain.push(context.as_str());
            current = source;
        }
        chain
    }

    /// Classification of the root cause.
    pub fn kind(&self) -> DuqlErrorKind {
        match self.root_cause() {
            DuqlError::ShapeMismatch { .. } => DuqlErrorKind::ShapeMismatch,
            DuqlError::UnknownStepType { .. } => DuqlErrorKind::UnknownStepType,
            DuqlError::MalformedStepBody { .. } => DuqlErrorKind::MalformedStepBody,
            DuqlError::InvalidIdentifier { .. } => DuqlErrorKind::InvalidIdentifier,
            DuqlError::AmbiguousDeclareValue { .. } => DuqlErrorKind::AmbiguousDeclareValue,
            DuqlError::EmptyFunctionParameters => DuqlErrorKind::EmptyFunctionParameters,
            DuqlError::EmptyStepBody { .. } => DuqlErrorKind::EmptyStepBody,
            DuqlError::EmptyLoopBody => DuqlErrorKind::EmptyLoopBody,
            DuqlError::MissingRequiredField { .. } => DuqlErrorKind::MissingRequiredField,
            DuqlError::Syntax(_) => DuqlErrorKind::Syntax,
            DuqlError::Io(_) => DuqlErrorKind::Io,
            DuqlError::Serde(_) => DuqlErrorKind::Serde,
            DuqlError::Internal(_) => DuqlErrorKind::Internal,
            // root_cause never stops on a context layer
            DuqlError::Context { .. } => DuqlErrorKind::Internal,
        }
    }

    /// Re-labels a bare shape mismatch raised while decoding the payload of
    /// step `tag` as a malformed step body. Errors of any other kind, or
    /// already wrapped errors, pass through untouched.
    pub(crate) fn into_malformed(self, tag: &str) -> Self {
        match self {
            DuqlError::ShapeMismatch {
                path,
                expected,
                found,
            } => DuqlError::MalformedStepBody {
                path,
                tag: tag.to_string(),
                message: format!("expected {}, found {}", expected, found),
            },
            DuqlError::MissingRequiredField { field } => DuqlError::MalformedStepBody {
                path: field.clone(),
                tag: tag.to_string(),
                message: format!("missing required field '{}'", field),
            },
            other => other,
        }
    }
}

/// Extension for attaching context to fallible results.
pub trait DuqlResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> DuqlResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| err.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.context(f()))
    }
}
