//! Schema-driven command dispatch for twin-modeled remote devices
//!
//! Devices declare the commands they accept, and the payload shapes those
//! commands take, in an externally hosted interface model. This crate owns
//! the path from an untyped `(device id, command name, JSON body)` triple to
//! a bounded-latency method invocation on the device:
//!
//! - Resolve the device's declared model identifier to its entity set
//! - Locate the single matching command definition
//! - Validate and convert the payload field to the declared primitive kind
//! - Invoke the method with a hard response timeout
//!
//! It also owns the connection handshake used to read a device twin over a
//! freshly opened transport: open, wait (bounded) for the asynchronous
//! status feed to confirm, read, and tear down cleanly.
//!
//! Registry, provisioning, model resolution, and the device transport itself
//! are collaborator boundaries expressed as async traits; thin client facades
//! apply the error policy (catch, log, return an absent result) so callers
//! never see a raw collaborator fault.

pub mod command;
pub mod error;
pub mod link;
pub mod model;
pub mod provisioning;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use command::{
    convert_payload, find_command, CommandDispatcher, ConvertOutcome, MethodChannel,
    MethodInvoker, STATUS_BAD_REQUEST,
};
pub use error::{SchemaError, TransportError};
pub use link::{DeviceLink, LinkConfig, LinkState};
pub use model::{
    CommandDefinition, Device, DeviceStatus, InterfaceModel, MethodInvocationResult, ModelEntity,
    ParameterDef, SchemaKind, Twin,
};
pub use provisioning::{AttestationKind, Enrollment, ProvisioningClient, ProvisioningService};
pub use registry::{DeviceRegistry, RegistryClient};
pub use resolver::ModelResolver;
pub use transport::{DeviceTransport, LinkStatus};

/// Latency budgets for remote calls
pub mod limits {
    /// Hard timeout for a device method invocation in milliseconds
    pub const METHOD_TIMEOUT_MS: u64 = 30_000;

    /// Wait between connection-status checks in milliseconds
    pub const CONNECT_WAIT_MS: u64 = 1_000;

    /// Maximum connection-status checks before proceeding unconfirmed
    pub const CONNECT_MAX_CHECKS: u32 = 10;
}
