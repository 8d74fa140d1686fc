use thiserror::Error;

/// Failure modes for probing a single serial port during [`crate::registry::DeviceRegistry::init`].
///
/// Every variant here is non-fatal to enumeration as a whole: the caller
/// skips the port and continues (§7, `PortUnavailable` / `MalformedHandshake`).
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("unable to open port: {0}")]
    PortUnavailable(#[from] serialport::Error),

    #[error("unable to write interface query: {0}")]
    WriteFailed(std::io::Error),

    #[error("malformed handshake reply: {reason}")]
    MalformedHandshake { reason: String },
}
