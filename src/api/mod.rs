//! Ride-hailing backend API
//!
//! This module provides the transport abstraction over the backend's
//! JSON endpoints, an HTTP implementation, an in-memory implementation for
//! unit tests and the typed client used by the views.

pub mod client;
pub mod errors;
#[cfg(test)]
pub mod memory;
pub mod transport;
pub mod types;

pub use client::RideClient;
pub use errors::ApiError;
#[cfg(test)]
pub use memory::MemoryTransport;
pub use transport::{HttpTransport, Transport};
pub use types::{Endpoint, IdentityQuery, TripsEnvelope, WriteAck, WriteKind, WriteOutcome};
