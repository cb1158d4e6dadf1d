use thiserror::Error;

/// A condition that leaves a connection unusable.
///
/// None of these are recoverable at the transport level; the distinction
/// between them exists for diagnostics only. Whoever owns the transport is
/// expected to drop it and build a new one.
#[derive(Error,Debug)]
pub enum TransportFault
{
    #[error("Could not connect: {0}")]
    Connect(String),
    #[error("Handshake failed: {0}")]
    Handshake(String),
    #[error("Server not answering")]
    ServerUnresponsive,
    #[error("Connection closed by peer")]
    ConnectionClosed,
    #[error("Connection broken: {0}")]
    ConnectionBroken(String),
}

impl From<std::io::Error> for TransportFault
{
    fn from(e: std::io::Error) -> Self
    {
        Self::ConnectionBroken(e.to_string())
    }
}
