//! Error taxonomy for the dispatch pipeline and collaborator boundaries

use thiserror::Error;

/// Failure of a remote collaborator call (registry, resolver, provisioning,
/// device transport or RPC channel).
///
/// Callers of the public dispatch surface never observe this type directly:
/// every occurrence is caught at the component boundary, logged, and collapsed
/// to an absent result.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The collaborator rejected the call or the call failed outright
    #[error("service error: {0}")]
    Service(String),

    /// The call exceeded its latency budget
    #[error("remote call timed out")]
    Timeout,
}

/// The resolved interface model cannot satisfy the requested command.
///
/// This is the one failure class surfaced distinctly to callers, separate
/// from payload validation (which produces a status-400 invocation result).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No command with this name is declared by the model
    #[error("command '{0}' not declared by the interface model")]
    CommandNotFound(String),

    /// The model is malformed: more than one command shares this name
    #[error("interface model declares multiple commands named '{0}'")]
    AmbiguousCommand(String),

    /// The declared parameter schema has no conversion rule
    #[error("schema kind '{0}' is not supported for payload conversion")]
    UnsupportedKind(String),
}
