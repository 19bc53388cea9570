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

use duql::{parse_and_validate, DuqlError, DuqlErrorKind, DuqlResultExt};

#[test]
fn test_empty_generate_reports_step_location() {
    let err = parse_and_validate(b"dataset: t\nsteps:\n  - take: 1\n  - generate: {}\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::EmptyStepBody);
    assert_eq!(
        err.to_string(),
        "steps: step 1 'generate': 'generate' must contain at least one entry"
    );
    assert_eq!(err.root_cause(), &DuqlError::empty_body("generate"));
}

#[test]
fn test_unknown_step_names_tag_and_position() {
    let err = parse_and_validate(b"dataset: t\nsteps:\n  - bogus: 1\n").unwrap_err();
    assert_eq!(err, DuqlError::unknown_step("steps[0]", "bogus"));
    assert_eq!(err.to_string(), "unknown step type 'bogus' at 'steps[0]'");
}

#[test]
fn test_payload_shape_errors_become_malformed_step_bodies() {
    let err = parse_and_validate(b"dataset: t\nsteps:\n  - take: [1, 2]\n").unwrap_err();
    assert_eq!(
        err,
        DuqlError::MalformedStepBody {
            path: "steps[0].take".into(),
            tag: "take".into(),
            message: "expected integer or string, found sequence".into(),
        }
    );
}

#[test]
fn test_missing_join_predicate_is_malformed() {
    let err = parse_and_validate(b"dataset: t\nsteps:\n  - join: {dataset: u}\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MalformedStepBody);
    assert!(err.to_string().contains("steps[0].join.where"));
}

#[test]
fn test_first_failure_wins() {
    let source = b"dataset: t\nsteps:\n  - generate: {}\n  - loop: []\n";
    let err = parse_and_validate(source).unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::EmptyStepBody);
}

#[test]
fn test_context_helpers_wrap_in_order() {
    let result: duql::Result<()> = Err(DuqlError::EmptyLoopBody);
    let err = result
        .context("inner")
        .with_context(|| format!("outer {}", 1))
        .unwrap_err();
    assert_eq!(err.context_chain(), vec!["outer 1", "inner"]);
    assert_eq!(err.to_string(), "outer 1: inner: loop must contain at least one step");
    assert_eq!(err.kind(), DuqlErrorKind::EmptyLoopBody);
}

#[test]
fn test_errors_serialize_for_reports() {
    let err = DuqlError::invalid_identifier("2bad").context("declare '2bad'");
    let json = serde_json::to_string(&err).unwrap();
    let back: DuqlError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}

#[test]
fn test_io_and_syntax_conversions_keep_messages() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err = DuqlError::from(io);
    assert_eq!(err.kind(), DuqlErrorKind::Io);
    assert!(err.to_string().contains("no such file"));

    let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
    assert_eq!(DuqlError::from(yaml_err).kind(), DuqlErrorKind::Syntax);
}

#[test]
fn test_kind_names_are_stable() {
    assert_eq!(DuqlErrorKind::UnknownStepType.to_string(), "UnknownStepType");
    assert_eq!(DuqlErrorKind::AmbiguousDeclareValue.as_str(), "AmbiguousDeclareValue");
}
