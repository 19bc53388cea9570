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

use duql::{
    parse_and_validate, DuqlDataFormat, DuqlDataset, DuqlError, DuqlErrorKind, DuqlExpression,
    DuqlFilter, DuqlQuery, DuqlStep, DuqlTake, DuqlTargetDialect,
};

#[test]
fn test_bare_dataset_document_is_valid() {
    let query = parse_and_validate(b"dataset: orders\n").unwrap();
    assert_eq!(query.dataset, DuqlDataset::Simple("orders".into()));
    assert!(query.steps.is_empty());
    assert!(query.settings.is_none());
    assert!(query.declare.is_none());
    assert!(query.into.is_none());
}

#[test]
fn test_empty_dataset_mapping_is_missing() {
    let query = DuqlQuery::from_yaml_str("dataset: {}\n").unwrap();
    let err = query.validate().unwrap_err();
    assert_eq!(err, DuqlError::missing("dataset"));
}

#[test]
fn test_absent_dataset_is_missing() {
    let err = parse_and_validate(b"steps:\n  - take: 1\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MissingRequiredField);

    let err = parse_and_validate(b"dataset: {format: csv}\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MissingRequiredField);
}

#[test]
fn test_filter_and_take_steps_decode_in_order() {
    let query = parse_and_validate(b"dataset: t\nsteps:\n  - filter: \"x > 1\"\n  - take: 10\n")
        .unwrap();
    assert_eq!(
        query.steps,
        vec![
            DuqlStep::Filter(DuqlFilter::new(DuqlExpression::text("x > 1"))),
            DuqlStep::Take(DuqlTake::count(10)),
        ]
    );
}

#[test]
fn test_full_document_populates_every_section() {
    let source = "\
settings:
  version: \"0.0.1\"
  target: sql.sqlite
declare:
  threshold: 10
dataset:
  name: events
  format: json
steps:
  - sort: ts
into: recent_events
";
    let query = parse_and_validate(source.as_bytes()).unwrap();
    let settings = query.settings.as_ref().unwrap();
    assert_eq!(settings.target, Some(DuqlTargetDialect::Sqlite));
    assert_eq!(query.declare.as_ref().map(|d| d.len()), Some(1));
    assert_eq!(query.dataset, DuqlDataset::complex("events", Some(DuqlDataFormat::Json)));
    assert_eq!(query.into.as_deref(), Some("recent_events"));
}

#[test]
fn test_unknown_top_level_keys_are_ignored() {
    let query = parse_and_validate(b"dataset: t\ncomment: nightly job\n").unwrap();
    assert_eq!(query.dataset.name(), "t");
}

#[test]
fn test_empty_document_fails_validation() {
    let query = DuqlQuery::from_yaml_str("").unwrap();
    assert_eq!(query, DuqlQuery::default());
    assert_eq!(query.validate().unwrap_err().kind(), DuqlErrorKind::MissingRequiredField);
}

#[test]
fn test_non_mapping_document_is_a_shape_error() {
    let err = parse_and_validate(b"- dataset: t\n").unwrap_err();
    match err {
        DuqlError::ShapeMismatch { path, expected, found } => {
            assert_eq!(path, "<document>");
            assert_eq!(expected, "mapping");
            assert_eq!(found, "sequence");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_text_is_a_syntax_error() {
    let err = parse_and_validate(b"dataset: [unclosed\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::Syntax);

    let err = parse_and_validate(&[0x64, 0xff, 0xfe]).unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::Syntax);
}

#[test]
fn test_steps_must_be_a_sequence() {
    let err = parse_and_validate(b"dataset: t\nsteps: {take: 1}\n").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("'steps'"));
}

#[test]
fn test_json_documents_decode_like_yaml() {
    let query = parse_and_validate(br#"{"dataset": "orders", "steps": [{"take": 3}]}"#).unwrap();
    assert_eq!(query.steps, vec![DuqlStep::Take(DuqlTake::count(3))]);
}

#[test]
fn test_builder_style_query_validates() {
    let mut query = DuqlQuery::new(DuqlDataset::simple("orders"));
    query.steps.push(DuqlStep::Take(DuqlTake::range("1..5")));
    assert!(query.validate().is_ok());
}
