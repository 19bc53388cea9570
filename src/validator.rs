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

//! # Validation Orchestrator
//!
//! [`parse_and_validate`] is the single entry point for one in-memory
//! document. [`DuqlValidator`] drives it over files and directory trees,
//! the way the `duql validate` command does.
//!
//! Each document is decoded and validated independently; nothing is shared
//! between documents, so directory batches can be spread across threads
//! (feature `parallel`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{DuqlError, Result};
use crate::query::DuqlQuery;

/// Decodes `raw` and validates the resulting query.
pub fn parse_and_validate(raw: &[u8]) -> Result<DuqlQuery> {
    let query = DuqlQuery::from_slice(raw)?;
    query.validate()?;
    Ok(query)
}

/// Batch validation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuqlValidatorConfig {
    /// File extensions (without the dot) treated as documents.
    pub extensions: Vec<String>,
    /// Descend into sub-directories.
    pub recursive: bool,
    /// Report the first failing file as an error instead of collecting
    /// every outcome.
    pub fail_fast: bool,
    /// Validate files on the rayon pool. Requires the `parallel` feature.
    pub parallel: bool,
}

impl Default for DuqlValidatorConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["duql".to_string(), "yml".to_string(), "yaml".to_string()],
            recursive: true,
            fail_fast: true,
            parallel: false,
        }
    }
}

impl DuqlValidatorConfig {
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether `path` carries one of the configured extensions
    /// (case-insensitive).
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Result of validating one file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuqlFileOutcome {
    pub path: PathBuf,
    pub error: Option<DuqlError>,
}

impl DuqlFileOutcome {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file outcomes of a batch, in path order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DuqlValidationReport {
    pub outcomes: Vec<DuqlFileOutcome>,
}

impl DuqlValidationReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn valid(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid(&self) -> usize {
        self.total() - self.valid()
    }

    pub fn is_success(&self) -> bool {
        self.invalid() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &DuqlFileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_valid())
    }
}

/// Validates documents on disk.
#[derive(Clone, Debug, Default)]
pub struct DuqlValidator {
    config: DuqlValidatorConfig,
}

impl DuqlValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DuqlValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DuqlValidatorConfig {
        &self.config
    }

    /// Reads, decodes and validates one file. Errors are wrapped with the
    /// file path.
    pub fn validate_file(&self, path: &Path) -> Result<DuqlQuery> {
        log::info!("validating file: {}", path.display());
        let result = fs::read(path)
            .map_err(DuqlError::from)
            .and_then(|raw| {
                log::debug!("read {} bytes from {}", raw.len(), path.display());
                parse_and_validate(&raw)
            })
            .map_err(|err| err.context(path.display().to_string()));

        match &result {
            Ok(_) => log::info!("valid document: {}", path.display()),
            Err(err) => log::error!("invalid document: {}", err),
        }
        result
    }

    /// Validates a single file, or every matching file below a directory.
    ///
    /// With `fail_fast` the first failure in path order is returned as the
    /// error; otherwise every outcome is collected into the report.
    pub fn validate_path(&self, path: &Path) -> Result<DuqlValidationReport> {
        let files = self.documents(path)?;
        let report = self.validate_files(&files);

        if self.config.fail_fast {
            if let Some(failure) = report.outcomes.iter().find_map(|o| o.error.clone()) {
                return Err(failure);
            }
        }
        Ok(report)
    }

    /// Documents addressed by `path`: the file itself, or every file with an
    /// accepted extension below a directory, sorted.
    pub fn documents(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path).map_err(|err| {
            log::error!("unable to access path: {}", path.display());
            DuqlError::from(err).context(path.display().to_string())
        })?;

        if !metadata.is_dir() {
            return Ok(vec![path.to_path_buf()]);
        }
        let mut files = Vec::new();
        self.collect_files(path, &mut files)?;
        files.sort();
        log::debug!("found {} documents under {}", files.len(), path.display());
        Ok(files)
    }

    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            // file_type does not follow links
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if self.config.recursive {
                    self.collect_files(&path, files)?;
                }
            } else if file_type.is_symlink() && path.is_dir() {
                log::debug!("skipping symlinked directory: {}", path.display());
            } else if self.config.accepts(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn outcome(&self, path: &Path) -> DuqlFileOutcome {
        DuqlFileOutcome {
            path: path.to_path_buf(),
            error: self.validate_file(path).err(),
        }
    }

    #[cfg(feature = "parallel")]
    fn validate_files(&self, files: &[PathBuf]) -> DuqlValidationReport {
        use rayon::prelude::*;

        // collect() on an indexed parallel iterator keeps input order
        let outcomes = if self.config.parallel {
            files.par_iter().map(|path| self.outcome(path)).collect()
        } else {
            self.validate_sequential(files)
        };
        DuqlValidationReport { outcomes }
    }

    #[cfg(not(feature = "parallel"))]
    fn validate_files(&self, files: &[PathBuf]) -> DuqlValidationReport {
        if self.config.parallel {
            log::warn!("parallel validation requested but the `parallel` feature is disabled");
        }
        DuqlValidationReport {
            outcomes: self.validate_sequential(files),
        }
    }

    fn validate_sequential(&self, files: &[PathBuf]) -> Vec<DuqlFileOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let outcome = self.outcome(path);
            let failed = !outcome.is_valid();
            outcomes.push(outcome);
            if failed && self.config.fail_fast {
                break;
            }
        }
        outcomes
    }
}
