//! Resilient RPC client plumbing.
//!
//! [`RpcTransport`] owns one logical connection to a remote gRPC service and
//! runs every call through a classify/retry/reconnect loop: transient
//! failures back off exponentially (plus jitter) and rebuild the channel
//! before retrying; terminal failures map to a typed [`TransportError`].
//! Callers always receive a value — nothing at this boundary panics or
//! bubbles a raw status.

pub mod client;
pub mod error;

pub use client::{RpcTransport, TransportOptions};
pub use error::TransportError;
