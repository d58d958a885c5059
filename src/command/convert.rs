//! Payload validation and conversion against declared parameter schemas

use crate::error::SchemaError;
use crate::model::{CommandDefinition, MethodInvocationResult, SchemaKind};
use serde_json::{json, Value};

/// Status returned for a payload that fails declared-type validation
pub const STATUS_BAD_REQUEST: i32 = 400;

/// Result of converting an untyped request body against a command definition
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    /// No request parameter declared, or the field is absent from the body;
    /// invoke with no payload
    Absent,
    /// The converted wire payload
    Payload(Value),
    /// The payload failed validation; carries the status-400 result and the
    /// device must not be invoked
    Rejected(MethodInvocationResult),
}

/// Validate and convert the request-parameter field of `body` into the
/// primitive representation the command's schema declares.
///
/// Every schema kind either produces a value or rejects explicitly; a kind
/// with no conversion rule fails closed with [`SchemaError::UnsupportedKind`].
pub fn convert_payload(
    def: &CommandDefinition,
    body: &Value,
) -> Result<ConvertOutcome, SchemaError> {
    let Some(param) = &def.request else {
        return Ok(ConvertOutcome::Absent);
    };
    // Missing field is permissive: invoke with no payload set
    let Some(raw) = body.get(&param.name) else {
        return Ok(ConvertOutcome::Absent);
    };

    match &param.schema {
        SchemaKind::String => Ok(ConvertOutcome::Payload(Value::String(render_string(raw)))),
        SchemaKind::Integer => Ok(convert_integer(&param.name, raw)),
        SchemaKind::Float | SchemaKind::Double => Ok(convert_floating(&param.name, raw)),
        SchemaKind::Other(kind) => Err(SchemaError::UnsupportedKind(kind.clone())),
    }
}

/// String schemas are total: any value's string rendering passes through
fn render_string(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Textual values must be plain unsigned decimal digits (no sign, no
/// whitespace, non-empty) and fit an i32; they are re-serialized as the
/// canonical decimal string. Native numbers are accepted iff integral and
/// within i32 range.
fn convert_integer(field: &str, raw: &Value) -> ConvertOutcome {
    match raw {
        Value::String(text) => {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return rejected(field, "expected unsigned decimal digits");
            }
            match text.parse::<i32>() {
                Ok(n) => ConvertOutcome::Payload(Value::String(n.to_string())),
                Err(_) => rejected(field, "integer out of 32-bit range"),
            }
        }
        Value::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => ConvertOutcome::Payload(Value::String(v.to_string())),
            None => rejected(field, "expected an integer within 32-bit range"),
        },
        _ => rejected(field, "expected an integer value"),
    }
}

/// Float/double schemas accept finite native numbers and textual values that
/// parse as f64 (no surrounding whitespace, same as the integer path);
/// everything else is rejected
fn convert_floating(field: &str, raw: &Value) -> ConvertOutcome {
    match raw {
        Value::Number(n) => match n.as_f64().filter(|v| v.is_finite()) {
            Some(_) => ConvertOutcome::Payload(raw.clone()),
            None => rejected(field, "expected a finite number"),
        },
        Value::String(text) => match text.parse::<f64>() {
            Ok(v) if v.is_finite() => ConvertOutcome::Payload(json!(v)),
            _ => rejected(field, "expected a decimal number"),
        },
        _ => rejected(field, "expected a numeric value"),
    }
}

fn rejected(field: &str, reason: &str) -> ConvertOutcome {
    ConvertOutcome::Rejected(MethodInvocationResult::new(
        STATUS_BAD_REQUEST,
        json!({ "error": format!("{}: {}", field, reason) }),
    ))
}
