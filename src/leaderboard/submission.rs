//! Score submission payload and its validation
//!
//! The payload is decoded field by field rather than through a derived
//! `Deserialize`, so that every offending field is reported in one response.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A validated score submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub name: String,
    pub time_ms: i64,
    pub moves: i64,
}

/// One validation failure, located by its path in the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    fn new(loc: &[&str], msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind,
        }
    }
}

/// All validation failures for a payload, serialized as the 422 body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{} invalid field(s): {}", .detail.len(), self.fields().join(", "))]
pub struct ValidationErrors {
    pub detail: Vec<FieldError>,
}

impl ValidationErrors {
    fn single(error: FieldError) -> Self {
        Self {
            detail: vec![error],
        }
    }

    /// Names of the offending fields, for logging
    pub fn fields(&self) -> Vec<&str> {
        self.detail
            .iter()
            .filter_map(|e| e.loc.last().map(String::as_str))
            .collect()
    }
}

impl ScoreSubmission {
    /// Parse and validate a JSON request body.
    ///
    /// Unknown fields are ignored. No range checks are applied: negative
    /// numbers and empty names are accepted.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationErrors> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationErrors::single(FieldError::new(
                &["body"],
                format!("JSON decode error: {}", e),
                "json_invalid",
            ))
        })?;

        let Value::Object(fields) = value else {
            return Err(ValidationErrors::single(FieldError::new(
                &["body"],
                "Input should be a valid dictionary or object",
                "model_attributes_type",
            )));
        };

        let mut errors = Vec::new();
        let name = string_field(&fields, "name", &mut errors);
        let time_ms = integer_field(&fields, "time_ms", &mut errors);
        let moves = integer_field(&fields, "moves", &mut errors);

        match (name, time_ms, moves) {
            (Some(name), Some(time_ms), Some(moves)) if errors.is_empty() => Ok(Self {
                name,
                time_ms,
                moves,
            }),
            _ => Err(ValidationErrors { detail: errors }),
        }
    }
}

fn missing(key: &str) -> FieldError {
    FieldError::new(&["body", key], "Field required", "missing")
}

fn string_field(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                &["body", key],
                "Input should be a valid string",
                "string_type",
            ));
            None
        }
        None => {
            errors.push(missing(key));
            None
        }
    }
}

fn integer_field(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let Some(value) = fields.get(key) else {
        errors.push(missing(key));
        return None;
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(FieldError::new(
            &["body", key],
            "Input should be a valid integer",
            "int_type",
        ));
    }
    parsed
}

/// `1200.0` is an integer; `12.5` and out-of-range values are not
fn whole_number(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}
