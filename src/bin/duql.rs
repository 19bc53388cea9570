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

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use duql::logging::{DuqlLogConfig, DuqlLogger};
use duql::{
    DuqlCanonicalCompiler, DuqlCompiler, DuqlOutputFormat, DuqlValidator, DuqlValidatorConfig,
};

#[derive(Parser)]
#[command(name = "duql")]
#[command(about = "DUQL - validate declarative YAML query pipelines")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LogArgs {
    /// Log threshold: TRACE, DEBUG, INFO, WARN, ERROR or OFF
    #[arg(long, global = true, env = "DUQL_LOG_LEVEL", default_value = "INFO")]
    log_level: String,

    /// Emit console logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append JSON log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document or every document below a directory
    Validate {
        /// File or directory to validate
        path: PathBuf,

        /// Validate directory entries in parallel
        #[arg(long)]
        parallel: bool,

        /// Report every invalid document instead of stopping at the first
        #[arg(long)]
        keep_going: bool,
    },

    /// Validate, then print the canonical form of each document
    Generate {
        /// File or directory to compile
        path: PathBuf,

        /// Output encoding: yaml or json
        #[arg(short, long, default_value = "yaml")]
        format: DuqlOutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = DuqlLogger::init(log_config(&cli.log)) {
        eprintln!("{}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Validate {
            path,
            parallel,
            keep_going,
        } => run_validate(&path, parallel, keep_going),
        Commands::Generate { path, format } => run_generate(&path, format),
    };

    match result {
        Ok(()) => log::info!("operation successful"),
        Err(e) => {
            log::error!("operation failed");
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn log_config(args: &LogArgs) -> DuqlLogConfig {
    let config = DuqlLogConfig::default()
        .with_level(args.log_level.as_str())
        .with_json_console(args.json_logs);
    match &args.log_file {
        Some(path) => config.with_file(path.display().to_string()),
        None => config,
    }
}

fn run_validate(path: &Path, parallel: bool, keep_going: bool) -> Result<()> {
    let config = DuqlValidatorConfig::default()
        .parallel(parallel)
        .fail_fast(!keep_going);
    let report = DuqlValidator::new().with_config(config).validate_path(path)?;

    for failure in report.failures() {
        if let Some(err) = &failure.error {
            eprintln!("invalid: {}", err);
        }
    }
    if !report.is_success() {
        bail!(
            "{} of {} documents failed validation",
            report.invalid(),
            report.total()
        );
    }
    println!("{} document(s) valid", report.total());
    Ok(())
}

fn run_generate(path: &Path, format: DuqlOutputFormat) -> Result<()> {
    let validator = DuqlValidator::new();
    let compiler = DuqlCanonicalCompiler::new(format);
    let files = validator.documents(path)?;
    let multiple = files.len() > 1;

    for file in &files {
        let query = validator.validate_file(file)?;
        let artifact = compiler.compile(&query)?;
        if multiple && format == DuqlOutputFormat::Yaml {
            println!("---");
        }
        print!("{}", artifact);
        if !artifact.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
