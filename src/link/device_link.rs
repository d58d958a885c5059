//! Device link lifecycle and the bounded connection-confirmation wait

use crate::error::TransportError;
use crate::limits;
use crate::model::Twin;
use crate::transport::{DeviceTransport, LinkStatus};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Budgets for the connection-confirmation wait
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Wait per status check
    pub connect_wait: Duration,
    /// Status checks before proceeding unconfirmed
    pub connect_checks: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            connect_wait: Duration::from_millis(limits::CONNECT_WAIT_MS),
            connect_checks: limits::CONNECT_MAX_CHECKS,
        }
    }
}

/// Lifecycle state of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection has been opened yet
    Unopened,
    /// Open request issued, confirmation pending
    Opening,
    /// Status feed confirmed the connection
    Connected,
    /// Confirmation budget exhausted; reads proceed best-effort
    Failed,
    /// Connection closed; a new `connect` reopens
    Closed,
}

/// Manages the single transport connection used to read a device's twin.
///
/// `connect` and `disconnect` are explicit and idempotent. The state lives
/// behind a mutex, so concurrent callers serialize instead of racing on
/// handle creation and teardown.
pub struct DeviceLink<T> {
    transport: T,
    config: LinkConfig,
    state: Mutex<LinkState>,
}

impl<T: DeviceTransport> DeviceLink<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, LinkConfig::default())
    }

    pub fn with_config(transport: T, config: LinkConfig) -> Self {
        Self {
            transport,
            config,
            state: Mutex::new(LinkState::Unopened),
        }
    }

    /// Current lifecycle state
    pub async fn state(&self) -> LinkState {
        *self.state.lock().await
    }

    /// Open the transport and wait for the status feed to confirm.
    ///
    /// The wait is a soft budget: if it exhausts, the link is marked
    /// [`LinkState::Failed`] and `Ok` is still returned, so a subsequent
    /// twin read proceeds best-effort. Calling `connect` on an already
    /// confirmed link is a no-op.
    pub async fn connect(&self, model_id: &str) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;

        if *state == LinkState::Connected {
            debug!("link already connected, ignoring connect");
            return Ok(());
        }

        *state = LinkState::Opening;
        info!("opening device link with model {}", model_id);

        // Subscribe before issuing the open request: a transport may confirm
        // during open() itself, and a send with no receiver is dropped
        let status = self.transport.status();

        if let Err(e) = self.transport.open(model_id).await {
            *state = LinkState::Failed;
            return Err(e);
        }

        *state = if self.wait_for_confirmation(status).await {
            info!("device link confirmed");
            LinkState::Connected
        } else {
            warn!(
                "link not confirmed within {:?}, proceeding best-effort",
                self.config.connect_wait * self.config.connect_checks
            );
            LinkState::Failed
        };

        Ok(())
    }

    /// Close the transport if a connection is open. Idempotent.
    pub async fn disconnect(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;

        match *state {
            LinkState::Unopened | LinkState::Closed => Ok(()),
            _ => {
                let result = self.transport.close().await;
                *state = LinkState::Closed;
                info!("device link closed");
                result
            }
        }
    }

    /// Read the twin over the link.
    ///
    /// Requires a prior `connect`; an unconfirmed ([`LinkState::Failed`])
    /// link still attempts the read.
    pub async fn fetch_twin(&self) -> Result<Twin, TransportError> {
        let state = self.state.lock().await;

        match *state {
            LinkState::Connected | LinkState::Failed => self.transport.get_twin().await,
            _ => Err(TransportError::Service("link not open".into())),
        }
    }

    /// One-shot handshake: open if needed, wait for confirmation, read the
    /// twin. The link stays open afterwards; pair with [`disconnect`].
    ///
    /// [`disconnect`]: DeviceLink::disconnect
    pub async fn connect_and_fetch_twin(&self, model_id: &str) -> Result<Twin, TransportError> {
        self.connect(model_id).await?;
        self.fetch_twin().await
    }

    /// Wait on the status feed until it reports connected or the overall
    /// budget runs out. Woken on change, never polled; status changes that
    /// are not confirmations do not extend the deadline, so a flapping feed
    /// cannot starve the budget.
    async fn wait_for_confirmation(&self, mut status: watch::Receiver<LinkStatus>) -> bool {
        if *status.borrow() == LinkStatus::Connected {
            return true;
        }

        let budget = self.config.connect_wait * self.config.connect_checks;
        let wait = timeout(budget, async {
            loop {
                // Feed dropped by the transport counts as unconfirmed
                if status.changed().await.is_err() {
                    return false;
                }
                if *status.borrow() == LinkStatus::Connected {
                    return true;
                }
            }
        })
        .await;

        wait.unwrap_or(false)
    }
}
