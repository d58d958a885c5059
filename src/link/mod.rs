//! Connection state machine for the twin-read handshake
//!
//! This module handles:
//! - Opening a transport connection declaring a model identifier
//! - Waiting (bounded) for the asynchronous status feed to confirm
//! - Reading the device twin over the confirmed connection
//! - Idempotent teardown and reopening

mod device_link;

pub use device_link::{DeviceLink, LinkConfig, LinkState};
