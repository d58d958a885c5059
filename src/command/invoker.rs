//! Bounded-latency device method invocation

use crate::error::TransportError;
use crate::limits;
use crate::model::MethodInvocationResult;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// RPC channel collaborator: sends one method invocation to a device
#[async_trait]
pub trait MethodChannel: Send + Sync {
    /// Invoke `command` on the named device, expecting a response within
    /// `response_timeout`
    async fn invoke_method(
        &self,
        device_id: &str,
        command: &str,
        payload: Option<&Value>,
        response_timeout: Duration,
    ) -> Result<MethodInvocationResult, TransportError>;
}

/// Invokes device methods over a [`MethodChannel`] with a hard response
/// timeout. A device-reported non-2xx status is a normal result; a channel
/// fault or budget overrun is logged and collapses to `None`.
pub struct MethodInvoker<C> {
    channel: C,
    response_timeout: Duration,
}

impl<C: MethodChannel> MethodInvoker<C> {
    pub fn new(channel: C) -> Self {
        Self::with_timeout(channel, Duration::from_millis(limits::METHOD_TIMEOUT_MS))
    }

    pub fn with_timeout(channel: C, response_timeout: Duration) -> Self {
        Self {
            channel,
            response_timeout,
        }
    }

    /// Dispatch exactly one remote call to the named device.
    ///
    /// The budget is passed to the channel and enforced locally as well, so
    /// the call fails fast even against a channel that never answers.
    pub async fn invoke(
        &self,
        device_id: &str,
        command: &str,
        payload: Option<&Value>,
    ) -> Option<MethodInvocationResult> {
        let call = self
            .channel
            .invoke_method(device_id, command, payload, self.response_timeout);

        match timeout(self.response_timeout, call).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                warn!("method {} on {} failed: {}", command, device_id, e);
                None
            }
            Err(_) => {
                warn!(
                    "method {} on {} timed out after {:?}",
                    command, device_id, self.response_timeout
                );
                None
            }
        }
    }
}
