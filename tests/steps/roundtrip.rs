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

use duql::compiler::{DuqlCanonicalCompiler, DuqlCompiler, DuqlOutputFormat};
use duql::{DuqlNodePath, DuqlQuery, DuqlStep};
use serde_yaml::Value;

fn decode_step(value: &Value) -> DuqlStep {
    DuqlStep::decode(value, &DuqlNodePath::root()).unwrap()
}

fn assert_step_round_trip(src: &str) {
    let first = decode_step(&serde_yaml::from_str(src).unwrap());
    let encoded = first.to_value();
    let second = decode_step(&encoded);
    assert_eq!(first, second, "{src}");
    assert_eq!(second.to_value(), encoded, "{src}");
}

#[test]
fn test_minimal_fragments_round_trip_for_every_variant() {
    for src in [
        "filter: x > 1",
        "filter: {or: [a, b]}",
        "join: {dataset: customers, where: a == b}",
        "join: {dataset: {name: c, format: csv}, where: a == b, retain: right}",
        "group: {by: region}",
        "group: {by: region, steps: [{take: 1}]}",
        "generate: {total: a + b, ratio: 0.5}",
        "sort: -amount",
        "sort: [a, b]",
        "take: 10",
        "take: 5..15",
        "window: {steps: []}",
        "window: {rows: 0..2, range: -5..5, expanding: true, rolling: 3, steps: [{sort: a}]}",
        "select: [a, b]",
        "\"select!\": c",
        "loop: [{filter: depth < 3}]",
        "summarize: {n: count this}",
    ] {
        assert_step_round_trip(src);
    }
}

fn sample_query() -> DuqlQuery {
    DuqlQuery::from_yaml_str(
        "\
settings: {version: 1.2, target: generic}
declare:
  threshold: 100
  recent: [{filter: created > @2024-01-01}]
  regions: {north: 1}
  scale:
    function:
      parameters: [x, {name: factor, default: 2}]
      expression: x * factor
dataset: {name: orders, format: table}
steps:
  - filter: total > threshold
  - group:
      by: region
      steps:
        - summarize: {revenue: sum total}
  - \"select!\": [internal_id]
  - take: 5
into: summary
",
    )
    .unwrap()
}

#[test]
fn test_query_round_trips_through_yaml() {
    let query = sample_query();
    assert!(query.validate().is_ok());
    let text = query.to_yaml_string().unwrap();
    let again = DuqlQuery::from_yaml_str(&text).unwrap();
    assert_eq!(again, query);
}

#[test]
fn test_query_round_trips_through_json() {
    let query = sample_query();
    let text = DuqlCanonicalCompiler::new(DuqlOutputFormat::Json)
        .compile(&query)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["dataset"]["name"], "orders");
    assert_eq!(json["settings"]["target"], "sql.generic");
    assert_eq!(DuqlQuery::from_yaml_str(&text).unwrap(), query);
}

#[test]
fn test_canonical_form_is_a_fixed_point() {
    let query = sample_query();
    let once = query.to_value();
    let twice = DuqlQuery::from_value(&once).unwrap().to_value();
    assert_eq!(once, twice);
}

#[test]
fn test_output_format_parses_names() {
    assert_eq!("yaml".parse::<DuqlOutputFormat>().unwrap(), DuqlOutputFormat::Yaml);
    assert_eq!("YML".parse::<DuqlOutputFormat>().unwrap(), DuqlOutputFormat::Yaml);
    assert_eq!("json".parse::<DuqlOutputFormat>().unwrap(), DuqlOutputFormat::Json);
    assert!("toml".parse::<DuqlOutputFormat>().is_err());
    assert_eq!(DuqlCanonicalCompiler::default().format(), DuqlOutputFormat::Yaml);
}
