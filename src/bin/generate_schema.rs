//! Schema generator for the platform event and result shapes.
//!
//! This binary writes `event_schema.json` describing every inbound event variant and the
//! matching result variant, for validating fixtures and documenting the wire contract.

use lambda_http_bridge::models::{HttpApiEvent, ProxyEvent, ProxyResult, ProxyResultV2};
use schemars::{JsonSchema, schema_for};
use serde_json::{Value, json};
use std::fs;

const OUTPUT_FILE: &str = "event_schema.json";

// One event shape with the schemas of its event and result
struct Shape {
    name: String,
    description: String,
    event_schema: Value,
    result_schema: Value,
}

fn main() {
    let shapes = vec![
        Shape {
            name: "alb".into(),
            description: "Application Load Balancer target event. Cookies are returned through multiValueHeaders[\"set-cookie\"].".into(),
            event_schema: generate_schema::<ProxyEvent>(),
            result_schema: generate_schema::<ProxyResult>(),
        },
        Shape {
            name: "apigw-v1".into(),
            description: "API Gateway REST API proxy event. Cookies are returned through multiValueHeaders[\"set-cookie\"].".into(),
            event_schema: generate_schema::<ProxyEvent>(),
            result_schema: generate_schema::<ProxyResult>(),
        },
        Shape {
            name: "apigw-v2".into(),
            description: "API Gateway HTTP API (payload 2.0) or function URL event. Cookies are returned as a discrete array.".into(),
            event_schema: generate_schema::<HttpApiEvent>(),
            result_schema: generate_schema::<ProxyResultV2>(),
        },
    ];

    write_schema(&shapes);
    println!("✅ Generated {OUTPUT_FILE} with {} shape(s)", shapes.len());
}

// Generates a standalone schema for the given type
fn generate_schema<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schema_for!(T)).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }

    schema
}

fn write_schema(shapes: &[Shape]) {
    let schemas: Vec<Value> = shapes
        .iter()
        .map(|shape| {
            json!({
                "name": shape.name,
                "description": shape.description,
                "eventSchema": shape.event_schema,
                "resultSchema": shape.result_schema
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&schemas).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    fs::write(OUTPUT_FILE, json).unwrap_or_else(|e| {
        eprintln!("Failed to write {OUTPUT_FILE}: {e}");
        std::process::exit(1);
    });
}
