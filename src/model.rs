//! Domain types: devices, twins, interface models, invocation results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A device identity as held by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device id
    pub id: String,
    /// Interface model the device declares, if any
    pub model_id: Option<String>,
    /// Registry lifecycle status, independent of any live connection
    #[serde(default)]
    pub status: DeviceStatus,
}

/// Registry lifecycle status of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Enabled,
    Disabled,
}

/// The registry's stored representation of a device's state and declared
/// model identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Twin {
    pub device_id: String,
    /// Model identifier reported by the device, if it declared one
    pub model_id: Option<String>,
    /// Reported properties document
    #[serde(default)]
    pub reported: Value,
    /// Desired properties document
    #[serde(default)]
    pub desired: Value,
}

impl Twin {
    /// Create a twin carrying only a device id and model id
    pub fn new(device_id: impl Into<String>, model_id: Option<String>) -> Self {
        Self {
            device_id: device_id.into(),
            model_id,
            reported: Value::Null,
            desired: Value::Null,
        }
    }
}

/// Entities declared by an interface model, keyed by entity name.
///
/// Immutable once resolved for a given dispatch.
pub type InterfaceModel = HashMap<String, ModelEntity>;

/// A named entity inside an interface model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEntity {
    /// An invocable command with optional request/response parameters
    Command(CommandDefinition),
    /// A readable (and possibly writable) property
    Property {
        name: String,
        schema: SchemaKind,
        writable: bool,
    },
    /// A telemetry stream
    Telemetry { name: String, schema: SchemaKind },
    /// A relationship to another model
    Relationship {
        name: String,
        target: Option<String>,
    },
}

/// A command entry in an interface model
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefinition {
    /// Command name; always non-empty for a well-formed model
    pub name: String,
    /// Request parameter, absent when the command takes no arguments
    pub request: Option<ParameterDef>,
    /// Response parameter, absent when the command returns nothing
    pub response: Option<ParameterDef>,
}

/// A named, schema-typed command parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    pub name: String,
    pub schema: SchemaKind,
}

/// Primitive payload kinds an interface model can declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Integer,
    Float,
    Double,
    /// A declared kind with no conversion rule (map, duration, ...).
    /// Matching a command with such a request schema fails closed.
    Other(String),
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::String => write!(f, "string"),
            SchemaKind::Integer => write!(f, "integer"),
            SchemaKind::Float => write!(f, "float"),
            SchemaKind::Double => write!(f, "double"),
            SchemaKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Status and payload returned by a device method invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInvocationResult {
    pub status: i32,
    #[serde(default)]
    pub payload: Value,
}

impl MethodInvocationResult {
    pub fn new(status: i32, payload: Value) -> Self {
        Self { status, payload }
    }

    /// Whether the device reported a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_twin_roundtrip() {
        let twin = Twin {
            device_id: "thermostat-1".into(),
            model_id: Some("dtmi:example:thermostat;1".into()),
            reported: json!({"temperature": 70}),
            desired: Value::Null,
        };

        let encoded = serde_json::to_string(&twin).unwrap();
        let decoded: Twin = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, twin);
    }

    #[test]
    fn test_invocation_result_status_classes() {
        assert!(MethodInvocationResult::new(200, Value::Null).is_success());
        assert!(MethodInvocationResult::new(204, Value::Null).is_success());
        assert!(!MethodInvocationResult::new(400, Value::Null).is_success());
        assert!(!MethodInvocationResult::new(500, Value::Null).is_success());
    }

    #[test]
    fn test_device_status_default() {
        let device: Device = serde_json::from_str(r#"{"id":"d1","model_id":null}"#).unwrap();
        assert_eq!(device.status, DeviceStatus::Enabled);
    }
}
