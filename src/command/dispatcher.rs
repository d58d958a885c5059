//! End-to-end command dispatch: twin lookup, model resolution, schema match,
//! payload conversion, invocation

use super::convert::{self, ConvertOutcome};
use super::invoker::{MethodChannel, MethodInvoker};
use super::matcher;
use crate::error::SchemaError;
use crate::limits;
use crate::model::MethodInvocationResult;
use crate::registry::{DeviceRegistry, RegistryClient};
use crate::resolver::ModelResolver;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Budgets for a dispatch
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Hard timeout for the device method invocation
    pub method_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            method_timeout: Duration::from_millis(limits::METHOD_TIMEOUT_MS),
        }
    }
}

/// Coordinates command invocation against a twin-modeled device.
///
/// Each dispatch is an independent sequential pipeline of remote calls; no
/// ordering holds between concurrent dispatches.
pub struct CommandDispatcher<R, M, C> {
    registry: RegistryClient<R>,
    resolver: M,
    invoker: MethodInvoker<C>,
}

impl<R, M, C> CommandDispatcher<R, M, C>
where
    R: DeviceRegistry,
    M: ModelResolver,
    C: MethodChannel,
{
    pub fn new(registry: R, resolver: M, channel: C) -> Self {
        Self::with_config(registry, resolver, channel, DispatchConfig::default())
    }

    pub fn with_config(registry: R, resolver: M, channel: C, config: DispatchConfig) -> Self {
        Self {
            registry: RegistryClient::new(registry),
            resolver,
            invoker: MethodInvoker::with_timeout(channel, config.method_timeout),
        }
    }

    /// Dispatch a named command with an untyped JSON body to a device.
    ///
    /// - `Ok(Some(result))` — the device answered (any status), or the
    ///   payload failed validation (status 400, device never invoked)
    /// - `Ok(None)` — device, twin, model id, model, or device answer was
    ///   unavailable; the cause is logged
    /// - `Err(SchemaError)` — the resolved model cannot satisfy the command
    pub async fn dispatch(
        &self,
        device_id: &str,
        command_name: &str,
        body: &Value,
    ) -> Result<Option<MethodInvocationResult>, SchemaError> {
        let Some(twin) = self.registry.twin(device_id).await else {
            warn!("no twin available for device {}", device_id);
            return Ok(None);
        };
        let Some(model_id) = twin.model_id else {
            warn!("device {} declares no model id", device_id);
            return Ok(None);
        };

        let model = match self.resolver.resolve_model(&model_id).await {
            Ok(model) => model,
            Err(e) => {
                warn!("resolving model {} failed: {}", model_id, e);
                return Ok(None);
            }
        };

        let def = matcher::find_command(&model, command_name)?;

        let payload = match convert::convert_payload(def, body)? {
            ConvertOutcome::Absent => None,
            ConvertOutcome::Payload(value) => Some(value),
            ConvertOutcome::Rejected(result) => {
                info!(
                    "payload for {} on {} rejected by schema validation",
                    command_name, device_id
                );
                return Ok(Some(result));
            }
        };

        Ok(self
            .invoker
            .invoke(device_id, command_name, payload.as_ref())
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::model::{
        CommandDefinition, Device, InterfaceModel, ModelEntity, ParameterDef, SchemaKind, Twin,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct StubRegistry {
        model_id: Option<String>,
    }

    #[async_trait]
    impl DeviceRegistry for StubRegistry {
        async fn get_device(&self, id: &str) -> Result<Option<Device>, TransportError> {
            Ok(Some(Device {
                id: id.into(),
                model_id: self.model_id.clone(),
                status: Default::default(),
            }))
        }

        async fn add_device(&self, id: &str) -> Result<Device, TransportError> {
            Ok(Device {
                id: id.into(),
                model_id: None,
                status: Default::default(),
            })
        }

        async fn remove_device(&self, _id: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn query_devices(&self) -> Result<Vec<Device>, TransportError> {
            Ok(Vec::new())
        }

        async fn get_twin(&self, id: &str) -> Result<Option<Twin>, TransportError> {
            Ok(Some(Twin::new(id, self.model_id.clone())))
        }
    }

    struct StubResolver {
        model: InterfaceModel,
    }

    #[async_trait]
    impl ModelResolver for StubResolver {
        async fn resolve_model(&self, _model_id: &str) -> Result<InterfaceModel, TransportError> {
            Ok(self.model.clone())
        }
    }

    struct RecordingChannel {
        status: i32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl MethodChannel for RecordingChannel {
        async fn invoke_method(
            &self,
            _device_id: &str,
            _command: &str,
            payload: Option<&Value>,
            _response_timeout: Duration,
        ) -> Result<MethodInvocationResult, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MethodInvocationResult::new(
                self.status,
                json!({ "received": payload }),
            ))
        }
    }

    fn thermostat_model() -> InterfaceModel {
        let mut model = InterfaceModel::new();
        model.insert(
            "reboot".into(),
            ModelEntity::Command(CommandDefinition {
                name: "reboot".into(),
                request: None,
                response: None,
            }),
        );
        model.insert(
            "setTemperature".into(),
            ModelEntity::Command(CommandDefinition {
                name: "setTemperature".into(),
                request: Some(ParameterDef {
                    name: "value".into(),
                    schema: SchemaKind::Integer,
                }),
                response: None,
            }),
        );
        model
    }

    fn dispatcher(
        status: i32,
        calls: Arc<AtomicU32>,
    ) -> CommandDispatcher<StubRegistry, StubResolver, RecordingChannel> {
        CommandDispatcher::new(
            StubRegistry {
                model_id: Some("dtmi:example:thermostat;1".into()),
            },
            StubResolver {
                model: thermostat_model(),
            },
            RecordingChannel { status, calls },
        )
    }

    #[tokio::test]
    async fn test_parameterless_command_invokes_with_no_payload() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = dispatcher(200, calls.clone());

        let result = dispatcher
            .dispatch("thermostat-1", "reboot", &json!({}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.payload, json!({ "received": null }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_integer_payload_converts_and_invokes() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = dispatcher(200, calls.clone());

        let result = dispatcher
            .dispatch("thermostat-1", "setTemperature", &json!({"value": "72"}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.payload, json!({ "received": "72" }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_returns_400_without_invoking() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = dispatcher(200, calls.clone());

        let result = dispatcher
            .dispatch("thermostat-1", "setTemperature", &json!({"value": "72f"}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.status, convert::STATUS_BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undeclared_command_surfaces_schema_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = dispatcher(200, calls.clone());

        let err = dispatcher
            .dispatch("thermostat-1", "selfDestruct", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err, SchemaError::CommandNotFound("selfDestruct".into()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_device_without_model_id_collapses_to_none() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = CommandDispatcher::new(
            StubRegistry { model_id: None },
            StubResolver {
                model: thermostat_model(),
            },
            RecordingChannel {
                status: 200,
                calls: calls.clone(),
            },
        );

        let outcome = dispatcher
            .dispatch("thermostat-1", "reboot", &json!({}))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolver_fault_collapses_to_none() {
        struct DownResolver;

        #[async_trait]
        impl ModelResolver for DownResolver {
            async fn resolve_model(
                &self,
                _model_id: &str,
            ) -> Result<InterfaceModel, TransportError> {
                Err(TransportError::Service("resolver unreachable".into()))
            }
        }

        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = CommandDispatcher::new(
            StubRegistry {
                model_id: Some("dtmi:example:thermostat;1".into()),
            },
            DownResolver,
            RecordingChannel {
                status: 200,
                calls: calls.clone(),
            },
        );

        let outcome = dispatcher
            .dispatch("thermostat-1", "reboot", &json!({}))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_device_error_status_passes_through() {
        let calls = Arc::new(AtomicU32::new(0));
        let dispatcher = dispatcher(503, calls.clone());

        let result = dispatcher
            .dispatch("thermostat-1", "reboot", &json!({}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.status, 503);
        assert!(!result.is_success());
    }
}
