//! Line-level transport for the IRC client protocol.
//!
//! This crate owns everything between a raw byte stream and a sequence of
//! protocol lines: the [`LineFramer`], which splits arbitrarily chunked input
//! into CR-LF terminated lines, and the [`Transport`], which wraps a stream
//! together with a framer and a liveness clock. Every unrecoverable condition
//! is reported as a [`TransportFault`]; the transport never tries to recover
//! on its own.

pub mod error;
pub use error::*;

mod framer;
pub use framer::*;

mod transport;
pub use transport::*;
