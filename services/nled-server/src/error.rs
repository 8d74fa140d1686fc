use thiserror::Error;

/// Failure modes for a single command handler.
///
/// Any variant here closes the session (§7: "handler failure closes the
/// session") — there is no retry or partial-success handling at this
/// layer.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("panel {0} does not exist")]
    UnknownPanel(i32),

    #[error("protocol error: {0}")]
    Proto(#[from] nled_proto::ProtoError),
}
