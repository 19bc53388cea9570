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

use duql::dataset::{DuqlDataFormat, DuqlDataset};
use duql::expression::{DuqlExpression, DuqlScalar};
use duql::node::{
    int_or_string, string_or_list, value_shape, DuqlColumns, DuqlNodePath, DuqlShape,
    DuqlTakeSpec,
};
use duql::settings::{DuqlSettings, DuqlTargetDialect};
use duql::{DuqlError, DuqlErrorKind};
use serde_yaml::Value;

fn yaml(src: &str) -> Value {
    serde_yaml::from_str(src).unwrap()
}

fn root() -> DuqlNodePath {
    DuqlNodePath::root()
}

#[test]
fn test_string_or_list_accepts_single_name_and_list() {
    assert_eq!(
        string_or_list(&yaml("region"), &root()).unwrap(),
        DuqlColumns::Single("region".into())
    );
    let many = string_or_list(&yaml("[region, -amount]"), &root()).unwrap();
    assert_eq!(many.names(), vec!["region", "-amount"]);
}

#[test]
fn test_string_or_list_rejects_mapping() {
    let err = string_or_list(&yaml("{a: 1}"), &root().key("sort")).unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("'sort'"));
}

#[test]
fn test_int_or_string_distinguishes_count_from_range() {
    assert_eq!(int_or_string(&yaml("10"), &root()).unwrap(), DuqlTakeSpec::Count(10));
    assert_eq!(
        int_or_string(&yaml("5..15"), &root()).unwrap(),
        DuqlTakeSpec::Range("5..15".into())
    );
    assert!(int_or_string(&yaml("true"), &root()).is_err());
    assert!(int_or_string(&yaml("[1]"), &root()).is_err());
}

#[test]
fn test_int_or_string_reports_take_counts_beyond_i64() {
    let err = int_or_string(&yaml("9223372036854775808"), &root().key("take")).unwrap_err();
    match err {
        DuqlError::ShapeMismatch { path, expected, found } => {
            assert_eq!(path, "take");
            assert_eq!(expected, "integer or string");
            assert_eq!(found, "integer out of range");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_value_shape_classifies_nodes_and_rejects_null() {
    assert!(matches!(value_shape(&yaml("x > 1"), &root()).unwrap(), DuqlShape::Scalar(_)));
    assert!(matches!(value_shape(&yaml("{a: 1}"), &root()).unwrap(), DuqlShape::Mapping(_)));
    assert!(matches!(value_shape(&yaml("[1, 2]"), &root()).unwrap(), DuqlShape::Sequence(_)));

    let err = value_shape(&Value::Null, &root().key("where")).unwrap_err();
    match err {
        DuqlError::ShapeMismatch { path, found, .. } => {
            assert_eq!(path, "where");
            assert_eq!(found, "null");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_expression_keeps_scalar_types() {
    let path = root();
    assert_eq!(
        DuqlExpression::decode(&yaml("x > 1"), &path).unwrap(),
        DuqlExpression::text("x > 1")
    );
    assert_eq!(
        DuqlExpression::decode(&yaml("42"), &path).unwrap(),
        DuqlExpression::Scalar(DuqlScalar::Integer(42))
    );
    assert_eq!(
        DuqlExpression::decode(&yaml("0.5"), &path).unwrap(),
        DuqlExpression::Scalar(DuqlScalar::Float(0.5))
    );
    assert_eq!(
        DuqlExpression::decode(&yaml("false"), &path).unwrap(),
        DuqlExpression::Scalar(DuqlScalar::Bool(false))
    );
}

#[test]
fn test_expression_keeps_unsigned_integers_beyond_i64() {
    let decoded = DuqlExpression::decode(&yaml("18446744073709551615"), &root()).unwrap();
    assert_eq!(decoded, DuqlExpression::Scalar(DuqlScalar::Unsigned(u64::MAX)));
    assert_eq!(decoded.to_value(), yaml("18446744073709551615"));
}

#[test]
fn test_expression_accepts_mapping_and_sequence() {
    let mapping = DuqlExpression::decode(&yaml("{sum: amount}"), &root()).unwrap();
    assert!(matches!(mapping, DuqlExpression::Mapping(ref m) if m.len() == 1));
    assert!(mapping.validate().is_ok());

    let sequence = DuqlExpression::decode(&yaml("[a, b, c]"), &root()).unwrap();
    assert!(matches!(sequence, DuqlExpression::Sequence(ref items) if items.len() == 3));
    assert_eq!(sequence.as_text(), None);
}

#[test]
fn test_expression_mapping_requires_string_keys() {
    let err = DuqlExpression::decode(&yaml("{1: a}"), &root()).unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::ShapeMismatch);
}

#[test]
fn test_dataset_decodes_simple_and_complex_forms() {
    assert_eq!(
        DuqlDataset::decode(&yaml("orders"), &root()).unwrap(),
        DuqlDataset::simple("orders")
    );
    assert_eq!(
        DuqlDataset::decode(&yaml("{name: events, format: csv}"), &root()).unwrap(),
        DuqlDataset::complex("events", Some(DuqlDataFormat::Csv))
    );

    let empty = DuqlDataset::decode(&yaml("{}"), &root()).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_dataset_rejects_unsupported_format_and_sequence() {
    let err = DuqlDataset::decode(&yaml("{name: t, format: xml}"), &root().key("dataset"))
        .unwrap_err();
    assert!(err.to_string().contains("dataset.format"));

    assert!(DuqlDataset::decode(&yaml("[a, b]"), &root()).is_err());
}

#[test]
fn test_settings_accept_qualified_and_bare_dialects() {
    let settings = DuqlSettings::decode(&yaml("{version: '0.0.1', target: sql.duckdb}"), &root())
        .unwrap();
    assert_eq!(settings.version.as_deref(), Some("0.0.1"));
    assert_eq!(settings.target, Some(DuqlTargetDialect::DuckDb));

    let bare = DuqlSettings::decode(&yaml("{target: clickhouse}"), &root()).unwrap();
    assert_eq!(bare.target, Some(DuqlTargetDialect::ClickHouse));
    assert_eq!(DuqlTargetDialect::ClickHouse.to_string(), "sql.clickhouse");
}

#[test]
fn test_settings_stringify_numeric_versions() {
    let settings = DuqlSettings::decode(&yaml("version: 1.2"), &root()).unwrap();
    assert_eq!(settings.version.as_deref(), Some("1.2"));
    assert_eq!(settings.target, None);
}

#[test]
fn test_settings_reject_unknown_dialect() {
    let err = DuqlSettings::decode(&yaml("target: sql.oracle"), &root().key("settings"))
        .unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("settings.target"));
}
