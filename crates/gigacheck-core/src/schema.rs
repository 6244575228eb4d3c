//! Structural schema of a `chat/completions` response
//!
//! Only presence and type of the required fields are checked. Whether the
//! content makes sense is left to the scenarios.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{json, Value};

use crate::error::{SchemaError, Violation};

/// Shared schema for every successful completion
pub fn chat_completion_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "object": {"type": "string"},
                "created": {"type": "integer"},
                "model": {"type": "string"},
                "choices": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "properties": {
                            "index": {"type": "integer"},
                            "message": {
                                "type": "object",
                                "properties": {
                                    "role": {"type": "string"},
                                    "content": {"type": "string"}
                                },
                                "required": ["role", "content"]
                            },
                            "finish_reason": {"type": "string"}
                        },
                        "required": ["index", "message", "finish_reason"]
                    }
                },
                "usage": {
                    "type": "object",
                    "properties": {
                        "prompt_tokens": {"type": "integer"},
                        "completion_tokens": {"type": "integer"},
                        "total_tokens": {"type": "integer"}
                    },
                    "required": ["prompt_tokens", "completion_tokens", "total_tokens"]
                }
            },
            "required": ["id", "object", "created", "model", "choices", "usage"]
        })
    })
}

/// Validate `instance` against an arbitrary `schema`
pub fn validate(instance: &Value, schema: &Value) -> Result<(), SchemaError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
    check(&validator, instance)
}

/// Validate `instance` against [`chat_completion_schema`], compiled once
pub fn validate_chat_completion(instance: &Value) -> Result<(), SchemaError> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    let compiled = VALIDATOR.get_or_init(|| {
        jsonschema::validator_for(chat_completion_schema()).map_err(|e| e.to_string())
    });

    match compiled {
        Ok(validator) => check(validator, instance),
        Err(message) => Err(SchemaError::InvalidSchema(message.clone())),
    }
}

fn check(validator: &Validator, instance: &Value) -> Result<(), SchemaError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|error| Violation {
            pointer: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Violations(violations))
    }
}
