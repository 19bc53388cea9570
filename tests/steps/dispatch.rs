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

use duql::node::{DuqlColumns, DuqlTakeSpec};
use duql::steps::{lookup, step_tags, STEP_TABLE};
use duql::{
    DuqlDataset, DuqlErrorKind, DuqlExpression, DuqlJoinType, DuqlNodePath, DuqlStep,
    DuqlStepNode,
};
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

fn decode(src: &str) -> duql::Result<DuqlStep> {
    let value: Value = serde_yaml::from_str(src).unwrap();
    DuqlStep::decode(&value, &DuqlNodePath::root().key("steps").index(0))
}

#[test]
fn test_table_lists_eleven_distinct_tags() {
    let tags: Vec<_> = step_tags().collect();
    assert_eq!(tags.len(), 11);
    assert_eq!(STEP_TABLE.len(), 11);
    for tag in [
        "filter", "join", "group", "generate", "sort", "take", "window", "select", "select!",
        "loop", "summarize",
    ] {
        assert!(tags.contains(&tag), "missing tag {tag}");
        assert_eq!(lookup(tag).map(|entry| entry.tag), Some(tag));
    }
    assert!(lookup("Select").is_none());
}

#[test]
fn test_every_tag_decodes_to_its_variant() {
    let cases = [
        ("filter: x > 1", "filter"),
        ("join: {dataset: u, where: a == b}", "join"),
        ("group: {by: region}", "group"),
        ("generate: {total: a + b}", "generate"),
        ("sort: [a]", "sort"),
        ("take: 3", "take"),
        ("window: {rolling: 3}", "window"),
        ("select: a", "select"),
        ("\"select!\": a", "select!"),
        ("loop: [{take: 1}]", "loop"),
        ("summarize: {n: count this}", "summarize"),
    ];
    for (src, tag) in cases {
        let step = decode(src).unwrap_or_else(|err| panic!("{src}: {err}"));
        assert_eq!(step.type_tag(), tag);
        assert_eq!(step.as_node().type_tag(), tag);
    }
}

#[test]
fn test_filter_accepts_every_expression_shape() {
    for src in ["filter: x > 1", "filter: true", "filter: {and: [a, b]}", "filter: [a, b]"] {
        let step = decode(src).unwrap();
        assert!(matches!(step, DuqlStep::Filter(_)), "{src}");
        assert!(step.validate().is_ok());
    }
}

#[test]
fn test_filter_rejects_null_predicate() {
    let err = decode("filter:").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MalformedStepBody);
}

#[test]
fn test_join_defaults_to_inner() {
    match decode("join: {dataset: customers, where: a.id == b.id}").unwrap() {
        DuqlStep::Join(join) => {
            assert_eq!(join.retain, DuqlJoinType::Inner);
            assert_eq!(join.dataset, DuqlDataset::simple("customers"));
            assert_eq!(join.predicate, DuqlExpression::text("a.id == b.id"));
        }
        other => panic!("unexpected step: {other:?}"),
    }
}

#[test]
fn test_join_reads_retain_and_structured_dataset() {
    match decode("join: {dataset: {name: customers, format: table}, where: x, retain: full}").unwrap() {
        DuqlStep::Join(join) => {
            assert_eq!(join.retain, DuqlJoinType::Full);
            assert_eq!(join.dataset.name(), "customers");
        }
        other => panic!("unexpected step: {other:?}"),
    }
    let err = decode("join: {dataset: c, where: x, retain: outer}").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MalformedStepBody);
}

#[test]
fn test_select_variants_take_one_or_many_columns() {
    match decode("select: name").unwrap() {
        DuqlStep::Select(select) => assert_eq!(select.columns, DuqlColumns::Single("name".into())),
        other => panic!("unexpected step: {other:?}"),
    }
    match decode("\"select!\": [a, b]").unwrap() {
        DuqlStep::SelectNot(select) => assert_eq!(select.columns.names(), vec!["a", "b"]),
        other => panic!("unexpected step: {other:?}"),
    }
    let err = decode("sort: 5").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::MalformedStepBody);
}

#[test]
fn test_take_reads_count_or_range() {
    match decode("take: 10").unwrap() {
        DuqlStep::Take(take) => assert_eq!(take.spec, DuqlTakeSpec::Count(10)),
        other => panic!("unexpected step: {other:?}"),
    }
    match decode("take: 5..15").unwrap() {
        DuqlStep::Take(take) => assert_eq!(take.spec, DuqlTakeSpec::Range("5..15".into())),
        other => panic!("unexpected step: {other:?}"),
    }
}

#[test]
fn test_step_object_must_have_exactly_one_key() {
    let err = decode("{filter: a, take: 1}").unwrap_err();
    assert_eq!(err.kind(), DuqlErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("mapping with 2 keys"));

    assert_eq!(decode("{}").unwrap_err().kind(), DuqlErrorKind::ShapeMismatch);
    assert_eq!(decode("filter").unwrap_err().kind(), DuqlErrorKind::ShapeMismatch);
}

#[test]
fn test_unquoted_scalar_tags_are_unknown_steps() {
    let cases = [("42: x", "42"), ("null: x", "null"), ("true: x", "true"), ("1.5: x", "1.5")];
    for (src, tag) in cases {
        let err = decode(src).unwrap_err();
        assert_eq!(err, duql::DuqlError::unknown_step("steps[0]", tag), "{src}");
    }
    assert_eq!(decode("? {a: 1}\n: x\n").unwrap_err().kind(), DuqlErrorKind::ShapeMismatch);
}

#[test]
fn test_every_table_row_decodes_a_step_that_validates_under_its_tag() {
    let payloads = [
        ("filter", "x > 1"),
        ("join", "{dataset: u, where: a == b}"),
        ("group", "{by: region, steps: [{take: 1}]}"),
        ("generate", "{total: a + b}"),
        ("sort", "[a]"),
        ("take", "3"),
        ("window", "{rolling: 3, steps: [{take: 1}]}"),
        ("select", "a"),
        ("select!", "[a]"),
        ("loop", "[{take: 1}]"),
        ("summarize", "{n: count this}"),
    ];
    for entry in STEP_TABLE.iter() {
        let (_, src) = payloads
            .iter()
            .find(|(tag, _)| *tag == entry.tag)
            .unwrap_or_else(|| panic!("no payload for {}", entry.tag));
        let payload: Value = serde_yaml::from_str(src).unwrap();
        let step = (entry.decode)(&payload, &DuqlNodePath::root().key(entry.tag)).unwrap();
        assert_eq!(step.type_tag(), entry.tag);
        assert!(step.validate().is_ok(), "{}", entry.tag);
    }
}

#[test]
fn test_empty_generate_and_summarize_fail_validation() {
    for (src, tag) in [("generate: {}", "generate"), ("summarize: {}", "summarize")] {
        let err = decode(src).unwrap().validate().unwrap_err();
        assert_eq!(err, duql::DuqlError::empty_body(tag));
    }
}

fn any_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z ]{0,8}".prop_map(Value::String),
        Just(Value::Sequence(vec![Value::String("a".into())])),
        Just(Value::Mapping(Mapping::new())),
    ]
}

fn any_scalar_key() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        any::<u64>().prop_map(|n| Value::Number(n.into())),
    ]
}

proptest! {
    #[test]
    fn test_unrecognised_tags_are_rejected(
        tag in "[A-Za-z_!]{1,12}".prop_filter("recognised tag", |t| lookup(t).is_none()),
        payload in any_payload()
    ) {
        let mut map = Mapping::new();
        map.insert(Value::String(tag.clone()), payload);
        let err = DuqlStep::decode(&Value::Mapping(map), &DuqlNodePath::root()).unwrap_err();
        prop_assert_eq!(err.kind(), DuqlErrorKind::UnknownStepType);
        let needle = format!("'{}'", tag);
        prop_assert!(err.to_string().contains(&needle));
    }

    #[test]
    fn test_unrecognised_scalar_tags_are_rejected(
        key in any_scalar_key(),
        payload in any_payload()
    ) {
        let mut map = Mapping::new();
        map.insert(key, payload);
        let err = DuqlStep::decode(&Value::Mapping(map), &DuqlNodePath::root()).unwrap_err();
        prop_assert_eq!(err.kind(), DuqlErrorKind::UnknownStepType);
    }

    #[test]
    fn test_non_empty_generate_and_summarize_validate(count in 1usize..6) {
        for tag in ["generate", "summarize"] {
            let mut entries = Mapping::new();
            for i in 0..count {
                entries.insert(Value::String(format!("c{}", i)), Value::String("a + 1".into()));
            }
            let mut step = Mapping::new();
            step.insert(Value::String(tag.into()), Value::Mapping(entries));
            let decoded = DuqlStep::decode(&Value::Mapping(step), &DuqlNodePath::root()).unwrap();
            prop_assert!(decoded.validate().is_ok());
        }
    }
}
