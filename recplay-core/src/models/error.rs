use std::fmt;

use thiserror::Error;

use super::direction::Direction;

/// The host-subsystem operation that failed, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOp {
    QueryConfig,
    OpenStream,
    StartStream,
    PollStream,
    CloseStream,
    Callback,
}

impl fmt::Display for StreamOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QueryConfig => "query-config",
            Self::OpenStream => "open-stream",
            Self::StartStream => "start-stream",
            Self::PollStream => "poll-stream",
            Self::CloseStream => "close-stream",
            Self::Callback => "stream-callback",
        };
        f.write_str(name)
    }
}

/// Errors that can abort a record/replay run.
///
/// Every variant is fatal: the session unwinds to a single release path
/// (ownership drops) and the process exits nonzero. There is no retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The stream settings are unusable. Raised before allocation or any
    /// device interaction.
    #[error("invalid stream settings: {0}")]
    InvalidSettings(String),

    /// Sample storage could not be allocated. Raised before any device
    /// interaction.
    #[error("could not allocate sample storage for {frames} frames")]
    Allocation { frames: usize },

    /// No default device exists for the given direction. An environment
    /// condition, reported distinctly from host malfunctions.
    #[error("no default {0} device")]
    NoDevice(Direction),

    /// A failure surfaced by the audio subsystem during open, start, poll,
    /// or close. Carries the host's numeric code and message verbatim.
    #[error("{op} failed with host error {code}: {text}")]
    Host {
        op: StreamOp,
        code: i32,
        text: String,
    },
}

impl StreamError {
    /// Process exit code for this failure.
    ///
    /// Host errors exit with the subsystem's own code; the two
    /// pre-hardware failures get small fixed codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Allocation { .. } => 1,
            Self::NoDevice(_) => 2,
            Self::InvalidSettings(_) => 3,
            Self::Host { code, .. } => *code,
        }
    }
}
