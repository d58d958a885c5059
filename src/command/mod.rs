//! Command dispatch pipeline
//!
//! This module handles:
//! - Locating a command definition inside a resolved interface model
//! - Validating and converting the untyped payload to the declared kind
//! - Invoking the method on the device with a hard response timeout
//! - Composing the stages into the end-to-end dispatch

mod convert;
mod dispatcher;
mod invoker;
mod matcher;

pub use convert::{convert_payload, ConvertOutcome, STATUS_BAD_REQUEST};
pub use dispatcher::{CommandDispatcher, DispatchConfig};
pub use invoker::{MethodChannel, MethodInvoker};
pub use matcher::find_command;
