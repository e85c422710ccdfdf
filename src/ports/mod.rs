//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedTransport` / `FeedConnection`: the streaming exchange connection
//! - `MessageDecoder`: raw wire messages into feed events

pub mod decoder;
pub mod transport;

pub use decoder::{DecodeError, Decoded, MessageDecoder};
pub use transport::{FeedConnection, FeedTransport, RawMessage, TransportError};
