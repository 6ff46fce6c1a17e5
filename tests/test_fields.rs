//! # Field Merger Test Suite

use pino_ng::core::error::LogError;
use pino_ng::loggers::fields::to_fields;
use pino_ng::loggers::{Fields, merge};
use serde::Serialize;
use serde_json::{Value, json};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn primary_wins_on_collision() {
    let primary = fields(json!({"a": 1}));
    let secondary = fields(json!({"a": 2, "b": 3}));

    let merged = merge(Some(&primary), Some(&secondary));

    assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3}));
    // Inputs are left as they were
    assert_eq!(Value::Object(primary), json!({"a": 1}));
    assert_eq!(Value::Object(secondary), json!({"a": 2, "b": 3}));
}

#[test]
fn absent_inputs_are_empty() {
    let only = fields(json!({"x": true}));

    assert_eq!(merge(None, None), Fields::new());
    assert_eq!(merge(Some(&only), None), only);
    assert_eq!(merge(None, Some(&only)), only);
}

#[test]
fn nested_values_are_replaced_not_deep_merged() {
    let primary = fields(json!({"user": {"id": 7}}));
    let secondary = fields(json!({"user": {"id": 1, "name": "ada"}}));

    let merged = merge(Some(&primary), Some(&secondary));

    assert_eq!(merged["user"], json!({"id": 7}));
}

#[derive(Serialize)]
struct RequestCtx<'a> {
    req_id: &'a str,
    attempt: u32,
}

#[test]
fn structs_convert_into_fields() {
    let ctx = to_fields(RequestCtx { req_id: "abc", attempt: 2 }).unwrap();
    assert_eq!(Value::Object(ctx), json!({"req_id": "abc", "attempt": 2}));

    assert_eq!(to_fields(Option::<RequestCtx>::None).unwrap(), Fields::new());
    assert!(matches!(to_fields(42), Err(LogError::SerializationError(_))));
}
