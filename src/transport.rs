//! Device transport boundary for the connection handshake

use crate::error::TransportError;
use crate::model::Twin;
use async_trait::async_trait;
use tokio::sync::watch;

/// Status reported by the transport's asynchronous connection callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connected,
}

/// A bidirectional device connection that can report its status and serve
/// twin reads.
///
/// The transport publishes status changes on a `watch` channel. This is the
/// only state crossing the callback/waiter boundary, so the handshake wait
/// is woken on change instead of polling a shared flag.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Open the connection, declaring the given model identifier
    async fn open(&self, model_id: &str) -> Result<(), TransportError>;

    /// Subscribe to the connection-status feed
    fn status(&self) -> watch::Receiver<LinkStatus>;

    /// Read the device twin over the open connection
    async fn get_twin(&self) -> Result<Twin, TransportError>;

    /// Close and release the connection
    async fn close(&self) -> Result<(), TransportError>;
}
