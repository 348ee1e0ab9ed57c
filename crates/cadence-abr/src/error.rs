use thiserror::Error;

/// Errors raised by the rate-adaptation engine.
///
/// Telemetry problems are never errors: a bad observation degrades to
/// holding the current quality. Only caller contract violations end up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AbrError {
    #[error("representation ladder is empty")]
    EmptyLadder,
    #[error(
        "representation {index} ({bitrate_bps} bps) is below its predecessor ({previous_bps} bps)"
    )]
    UnorderedLadder {
        index: usize,
        bitrate_bps: u64,
        previous_bps: u64,
    },
    #[error("invalid ABR options: {0}")]
    InvalidOptions(String),
}

pub type AbrResult<T> = Result<T, AbrError>;
